//! Page-by-page text extraction driver.
//!
//! Progress bands: 0% at start, 20% once the bytes are read, 40% once the
//! document is loaded, 40–90% across the page loop, 100% when finished.
//! Only read and load failures abort an extraction. A failing page is
//! replaced by an inline error block and the loop carries on.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendError, PdfBackend, PdfDocument};
use crate::{NO_TEXT_SENTINEL, PAGE_ERROR_MARKER, Progress};

/// Callback receiving every progress update of one extraction.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(BackendError),
    #[error("extraction cancelled")]
    Cancelled,
    #[error("extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Pause between reporting 100% and handing over the text, so the
    /// finished progress bar is visible.
    pub completion_delay: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            completion_delay: Duration::from_millis(500),
        }
    }
}

/// Events emitted by [`run_extraction`], tagged with the session generation
/// they were started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    Progress { generation: u64, progress: Progress },
    Complete { generation: u64, text: String },
    Failed { generation: u64, error: String },
}

/// Percentage reported after finishing `page` of `total` (1-based).
pub fn page_percent(page: usize, total: usize) -> u8 {
    if total == 0 {
        return 90;
    }
    // 40 + round(page / total * 50), rounding halves up
    let pct = 40 + (100 * page + total) / (2 * total);
    pct.min(90) as u8
}

/// The block appended for one page.
pub fn page_block(page: usize, text: &str) -> String {
    format!("--- Page {page} ---\n\n{text}\n\n")
}

/// Trim the accumulated text, falling back to [`NO_TEXT_SENTINEL`].
pub fn finalize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Run the page loop over an already loaded document.
///
/// Pages are requested strictly in ascending order. `cancel` is checked
/// before each page.
pub fn extract_pages(
    document: &dyn PdfDocument,
    progress: &dyn Fn(Progress),
    cancel: &CancellationToken,
) -> Result<String, ExtractError> {
    let total = document.page_count();
    let mut full_text = String::new();

    for page in 1..=total {
        if cancel.is_cancelled() {
            tracing::debug!(page, total, "extraction cancelled before page");
            return Err(ExtractError::Cancelled);
        }

        match document.text_content(page) {
            Ok(content) => {
                let page_text = content.joined();
                tracing::debug!(page, total, items = content.items.len(), "page extracted");
                if !page_text.trim().is_empty() {
                    full_text.push_str(&page_block(page, &page_text));
                }
            }
            Err(err) => {
                tracing::warn!(page, error = %err, "error extracting text from page");
                full_text.push_str(&page_block(page, PAGE_ERROR_MARKER));
            }
        }

        progress(Progress::new(
            page_percent(page, total),
            format!("Processing page {page} of {total}..."),
        ));
    }

    Ok(finalize(&full_text))
}

/// Read `path`, load it with `backend` and extract every page.
///
/// Loading and the page loop run on the blocking pool; the document
/// handle is created and dropped there.
pub async fn extract_file(
    path: &Path,
    backend: Arc<dyn PdfBackend>,
    progress: ProgressFn,
    cancel: &CancellationToken,
) -> Result<String, ExtractError> {
    progress(Progress::new(0, "Loading PDF..."));

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if cancel.is_cancelled() {
        return Err(ExtractError::Cancelled);
    }
    progress(Progress::new(20, "Parsing PDF structure..."));

    let blocking_progress = Arc::clone(&progress);
    let blocking_cancel = cancel.clone();
    let text = tokio::task::spawn_blocking(move || {
        let document = backend.load(&bytes).map_err(ExtractError::Parse)?;
        tracing::info!(
            pages = document.page_count(),
            bytes = bytes.len(),
            "document loaded"
        );
        blocking_progress(Progress::new(40, "Extracting text..."));
        extract_pages(document.as_ref(), &*blocking_progress, &blocking_cancel)
    })
    .await
    .map_err(|e| ExtractError::Task(e.to_string()))??;

    progress(Progress::new(100, "Complete!"));
    Ok(text)
}

/// Drive one extraction for the session `generation`, reporting through `tx`.
///
/// On success the text is sent after `options.completion_delay`. Nothing is
/// sent once `cancel` fires.
pub async fn run_extraction(
    path: PathBuf,
    generation: u64,
    backend: Arc<dyn PdfBackend>,
    options: ExtractOptions,
    tx: mpsc::UnboundedSender<DriverEvent>,
    cancel: CancellationToken,
) {
    let progress_tx = tx.clone();
    let progress_cancel = cancel.clone();
    let progress: ProgressFn = Arc::new(move |progress| {
        if !progress_cancel.is_cancelled() {
            let _ = progress_tx.send(DriverEvent::Progress {
                generation,
                progress,
            });
        }
    });

    match extract_file(&path, backend, progress, &cancel).await {
        Ok(text) => {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(generation, "cancelled during completion delay");
                }
                _ = tokio::time::sleep(options.completion_delay) => {
                    tracing::info!(generation, chars = text.len(), "extraction complete");
                    let _ = tx.send(DriverEvent::Complete { generation, text });
                }
            }
        }
        Err(ExtractError::Cancelled) => {
            tracing::debug!(generation, path = %path.display(), "extraction cancelled");
        }
        Err(err) => {
            tracing::warn!(generation, path = %path.display(), error = %err, "error processing PDF");
            let _ = tx.send(DriverEvent::Failed {
                generation,
                error: err.to_string(),
            });
        }
    }
}
