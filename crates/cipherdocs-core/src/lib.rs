use std::fmt;

pub mod actions;
pub mod backend;
pub mod config_file;
pub mod extract;
pub mod intake;
pub mod mock;
pub mod session;

// Re-export for convenience
pub use actions::{ClipboardError, SaveError, download_filename, save_text};
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use extract::{
    DriverEvent, ExtractError, ExtractOptions, extract_file, extract_pages, run_extraction,
};
pub use intake::{IntakeError, PDF_MEDIA_TYPE, declared_media_type, parse_dropped_paths};
pub use session::{Notice, NoticeKind, Session, SessionEvent, View, reduce};

/// Output when every page came back empty.
pub const NO_TEXT_SENTINEL: &str = "No text could be extracted from this PDF.";

/// Inline marker written in place of a page whose extraction failed.
pub const PAGE_ERROR_MARKER: &str = "[Error extracting text from this page]";

/// A single run of text on a page, as reported by the PDF library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The text content of one page: an ordered sequence of text items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextContent {
    pub items: Vec<TextItem>,
}

impl TextContent {
    pub fn from_strs<S: AsRef<str>>(items: &[S]) -> Self {
        Self {
            items: items.iter().map(|s| TextItem::new(s.as_ref())).collect(),
        }
    }

    /// Join the item strings with single spaces.
    pub fn joined(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Current extraction progress. Overwritten on every step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// 0–100.
    pub percent: u8,
    pub message: String,
}

impl Progress {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}", self.percent, self.message)
    }
}
