//! Mock PDF backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{BackendError, PdfBackend, PdfDocument};
use crate::TextContent;

/// Scripted content for one page of a [`MockBackend`] document.
#[derive(Clone, Debug)]
pub enum MockPage {
    /// The page yields these text items.
    Text(Vec<String>),
    /// Requesting the page fails with this message.
    Fail(String),
}

impl MockPage {
    pub fn text(items: &[&str]) -> Self {
        MockPage::Text(items.iter().map(|s| s.to_string()).collect())
    }

    pub fn empty() -> Self {
        MockPage::Text(Vec::new())
    }

    pub fn fail(message: &str) -> Self {
        MockPage::Fail(message.to_string())
    }
}

type PageHook = Arc<dyn Fn(usize) + Send + Sync>;

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Supports:
/// - A fixed list of scripted pages, or a load failure.
/// - Optional per-page latency.
/// - A hook called with the page number before each page is served.
/// - Recording of the order pages were requested in.
pub struct MockBackend {
    pages: Vec<MockPage>,
    load_error: Option<String>,
    delay: Option<Duration>,
    hook: Option<PageHook>,
    load_count: AtomicUsize,
    requested: Arc<Mutex<Vec<usize>>>,
}

impl MockBackend {
    /// Create a mock whose documents contain `pages`.
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            load_error: None,
            delay: None,
            hook: None,
            load_count: AtomicUsize::new(0),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose `load` always fails with `message`.
    pub fn failing_load(message: &str) -> Self {
        Self {
            load_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Set simulated latency per page.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Call `hook(page)` before serving each page.
    pub fn with_page_hook(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// How many times `load` was called.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Page numbers in the order they were requested.
    pub fn requested_pages(&self) -> Vec<usize> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PdfBackend for MockBackend {
    fn load(&self, _bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.load_error {
            return Err(BackendError::OpenError(message.clone()));
        }
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            delay: self.delay,
            hook: self.hook.clone(),
            requested: Arc::clone(&self.requested),
        }))
    }
}

struct MockDocument {
    pages: Vec<MockPage>,
    delay: Option<Duration>,
    hook: Option<PageHook>,
    requested: Arc<Mutex<Vec<usize>>>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn text_content(&self, page: usize) -> Result<TextContent, BackendError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(page);
        }
        if let Some(hook) = &self.hook {
            hook(page);
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let count = self.pages.len();
        let scripted = page
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or(BackendError::PageOutOfRange { page, count })?;

        match scripted {
            MockPage::Text(items) => Ok(TextContent::from_strs(items)),
            MockPage::Fail(message) => Err(BackendError::ExtractionError {
                page,
                message: message.clone(),
            }),
        }
    }
}
