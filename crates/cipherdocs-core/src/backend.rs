use thiserror::Error;

use crate::TextContent;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("failed to extract text from page {page}: {message}")]
    ExtractionError { page: usize, message: String },
}

/// Trait for PDF libraries that can open a document from memory.
///
/// Implementors own all structural parsing; the extraction driver in
/// [`crate::extract`] only sees page counts and per-page text items.
pub trait PdfBackend: Send + Sync {
    /// Parse `bytes` into a document handle.
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// A loaded document. Handles are used from the thread that created them.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Text content of the 1-based `page`.
    fn text_content(&self, page: usize) -> Result<TextContent, BackendError>;
}
