use std::path::PathBuf;

use cipherdocs_core::DriverEvent;

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Extract `path` for session `generation`. Supersedes any running extraction.
    Extract { path: PathBuf, generation: u64 },
    /// Cancel the running extraction, if any.
    CancelExtraction,
}

/// Events flowing from the backend extraction task to the TUI.
pub type BackendEvent = DriverEvent;
