mod backend;
mod update;
mod update_results;
mod update_upload;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use cipherdocs_core::config_file::Settings;
use cipherdocs_core::intake::{self, IntakeError};
use cipherdocs_core::{Session, SessionEvent, View, reduce};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// State for the file picker on the upload screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_pdf: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(current_dir)
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let mut state = Self {
            current_dir: dir.into(),
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_pdf: false,
            });
        }

        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs = Vec::new();
                let mut files = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    // Skip hidden files/dirs
                    if name.starts_with('.') {
                        continue;
                    }

                    if path.is_dir() {
                        dirs.push(FileEntry {
                            name,
                            path,
                            is_dir: true,
                            is_pdf: false,
                        });
                    } else {
                        let is_pdf = intake::validate(&path).is_ok();
                        files.push(FileEntry {
                            name,
                            path,
                            is_dir: false,
                            is_pdf,
                        });
                    }
                }

                dirs.sort_by_key(|e| e.name.to_lowercase());
                files.sort_by_key(|e| e.name.to_lowercase());

                entries.extend(dirs);
                entries.extend(files);
            }
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot read directory");
            }
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    /// Move to the parent directory, keeping the cursor on the one we left.
    pub fn go_up(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let left = std::mem::replace(&mut self.current_dir, parent);
        self.refresh_entries();
        if let Some(pos) = self.entries.iter().position(|e| e.path == left) {
            self.cursor = pos;
        }
    }

    pub fn current(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state.
pub struct App {
    /// Upload / processing / results state, changed only through [`reduce`].
    pub session: Session,
    pub file_picker: FilePickerState,
    pub theme: Theme,
    pub settings: Settings,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// First visible line of the extracted text.
    pub results_scroll: u16,
    /// Height of the visible list/text area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// "Copied!" is shown in the results footer until this instant.
    pub copied_until: Option<Instant>,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Last file list area rendered (for mouse click → row mapping).
    pub last_list_area: Option<Rect>,
    /// Last drop zone area rendered (for drag hover detection).
    pub last_drop_zone: Option<Rect>,
    /// Inside of the results text box as last rendered (for scroll limits).
    pub last_text_area: Option<Rect>,
    /// Where OSC 52 clipboard sequences are written.
    pub(crate) clipboard: Box<dyn Write>,
}

impl App {
    pub fn new(theme: Theme, settings: Settings) -> Self {
        Self {
            session: Session::new(),
            file_picker: FilePickerState::new(),
            theme,
            settings,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            results_scroll: 0,
            visible_rows: 20,
            copied_until: None,
            backend_cmd_tx: None,
            last_list_area: None,
            last_drop_zone: None,
            last_text_area: None,
            clipboard: Box::new(std::io::stdout()),
        }
    }

    /// Run `event` through the session reducer.
    pub(super) fn apply(&mut self, event: SessionEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = reduce(session, event);
    }

    fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(cmd).is_err()
        {
            tracing::error!("backend listener is gone");
        }
    }

    /// Offer candidate files (a picked entry, a drop, or a CLI argument).
    ///
    /// Only the first candidate counts. A PDF starts an extraction; anything
    /// else raises the invalid-file notice.
    pub fn submit_files(&mut self, candidates: Vec<PathBuf>) {
        if self.session.view != View::Upload {
            return;
        }
        match intake::accept_first(candidates) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "file accepted");
                self.apply(SessionEvent::FileAccepted { path: path.clone() });
                let generation = self.session.generation;
                self.send(BackendCommand::Extract { path, generation });
            }
            Err(IntakeError::InvalidFileType { path, declared }) => {
                tracing::info!(path = %path.display(), declared = %declared, "file rejected");
                self.apply(SessionEvent::FileRejected { declared });
            }
            Err(IntakeError::NoFile) => {}
        }
    }

    /// Back to a clean upload screen, cancelling any running extraction.
    pub fn reset(&mut self) {
        if self.session.view == View::Processing {
            self.send(BackendCommand::CancelExtraction);
        }
        self.apply(SessionEvent::Reset);
        self.results_scroll = 0;
        self.copied_until = None;
    }

    pub(super) fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(until) = self.copied_until
            && Instant::now() >= until
        {
            self.copied_until = None;
        }
    }

    /// Name of the selected file for headers.
    pub fn file_name(&self) -> String {
        self.session
            .selected_file
            .as_ref()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .unwrap_or_default()
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.session.view {
            View::Upload => crate::view::upload::render_in(f, self, area),
            View::Processing => crate::view::processing::render_in(f, self, area),
            View::Results => crate::view::results::render_in(f, self, area),
        }

        if let Some(notice) = &self.session.notice {
            crate::view::notice::render(f, notice, &self.theme);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}
