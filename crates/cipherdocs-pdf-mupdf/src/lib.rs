use mupdf::{Document, TextPageFlags};

use cipherdocs_core::{BackendError, PdfBackend, PdfDocument, TextContent, TextItem};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// The mupdf dependency (AGPL-3.0) lives only in this crate; the rest of
/// the workspace talks to it through the core traits.
///
/// Each text line of a MuPDF structured-text page becomes one [`TextItem`],
/// in block order.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        let document = Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        if document
            .needs_password()
            .map_err(|e| BackendError::OpenError(e.to_string()))?
        {
            return Err(BackendError::OpenError("document is password protected".into()));
        }

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        let page_count = usize::try_from(page_count).unwrap_or(0);

        tracing::debug!(page_count, "mupdf document opened");
        Ok(Box::new(MupdfDocument {
            document,
            page_count,
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn text_content(&self, page: usize) -> Result<TextContent, BackendError> {
        if page == 0 || page > self.page_count {
            return Err(BackendError::PageOutOfRange {
                page,
                count: self.page_count,
            });
        }
        let extraction_error = |e: mupdf::Error| BackendError::ExtractionError {
            page,
            message: e.to_string(),
        };

        // MuPDF pages are 0-based.
        let index = i32::try_from(page - 1).map_err(|_| BackendError::PageOutOfRange {
            page,
            count: self.page_count,
        })?;
        let loaded = self.document.load_page(index).map_err(extraction_error)?;
        let text_page = loaded
            .to_text_page(TextPageFlags::empty())
            .map_err(extraction_error)?;

        let mut items = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                items.push(TextItem { text });
            }
        }

        Ok(TextContent { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let backend = MupdfBackend::new();
        let result = backend.load(b"this is definitely not a pdf");
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }
}
