use crate::data::{DocumentStore, StoreError};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// In-memory DocumentStore, for hosts that keep documents elsewhere and for tests.
///
/// Paths listed with [`MemoryDocumentStore::fail_writes_to`] reject writes,
/// which lets callers exercise per-file failure handling.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<String, String>>,
    read_only: Mutex<HashSet<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .lock_documents()
            .extend(documents.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    pub fn fail_writes_to(&self, path: &str) {
        self.read_only
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string());
    }

    /// Current content of `path`, if present
    pub fn get(&self, path: &str) -> Option<String> {
        self.lock_documents().get(path).cloned()
    }

    fn lock_documents(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn read_text_file(&self, path: &str) -> Result<String, StoreError> {
        self.get(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write_text_file(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let read_only = self
            .read_only
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path);
        if read_only {
            return Err(StoreError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.lock_documents().insert(path.to_string(), content.to_string());
        Ok(())
    }
}
