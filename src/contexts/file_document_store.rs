use crate::data::{DocumentStore, StoreError};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// FileDocumentStore is an implementation of the DocumentStore trait backed by
/// a directory on disk. Document paths are resolved relative to that root.
///
/// Paths come from model output, so anything absolute or climbing out of the
/// root with `..` is rejected before touching the filesystem.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    /// The root folder documents live in (defaults to ".")
    root: PathBuf,
}

impl FileDocumentStore {
    /// Creates a new FileDocumentStore
    ///
    /// # Arguments
    /// * `root` - Optional root folder. If None, defaults to the current directory
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root: root.unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a document path onto the filesystem, refusing paths that escape the root
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir if depth > 0 => {
                    resolved.pop();
                    depth -= 1;
                }
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::InvalidPath(path.to_string()));
                }
            }
        }

        if depth == 0 {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(resolved)
    }
}

impl DocumentStore for FileDocumentStore {
    async fn read_text_file(&self, path: &str) -> Result<String, StoreError> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            _ => StoreError::Io {
                path: path.to_string(),
                source: e,
            },
        })
    }

    async fn write_text_file(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        let io_error = |source| StoreError::Io {
            path: path.to_string(),
            source,
        };

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        fs::write(&full, content).await.map_err(io_error)
    }
}
