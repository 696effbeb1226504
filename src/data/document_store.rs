use std::future::Future;
use thiserror::Error;

/// Errors raised by a [`DocumentStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Storage collaborator the engine reads documents from and writes them back to.
///
/// The engine reads each file once before applying directives and writes it
/// at most once afterwards. Implementations decide what a path means.
pub trait DocumentStore {
    /// Reads a whole document.
    ///
    /// # Returns
    /// * `Err(StoreError::NotFound)` - The document does not exist yet
    fn read_text_file(&self, path: &str) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Replaces a whole document, creating it when missing
    fn write_text_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
