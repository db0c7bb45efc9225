//! Session state and its reducer.
//!
//! A [`Session`] is only changed through [`reduce`]. Each accepted file and
//! each reset bumps `generation`; driver events carry the generation they
//! were started for and are dropped when it no longer matches.

use std::path::PathBuf;

use crate::extract::DriverEvent;
use crate::Progress;

pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please select a valid PDF file.";
pub const PROCESSING_FAILED_MESSAGE: &str =
    "Error processing PDF file. Please try again with a different file.";
pub const CLIPBOARD_FAILED_MESSAGE: &str =
    "Failed to copy text to clipboard. Please select and copy manually.";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save the extracted text.";

/// Which of the three views is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Upload,
    Processing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    InvalidFileType,
    ProcessingFailed,
    ClipboardFailed,
    SaveFailed,
}

/// A blocking notification, shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Underlying error, for display under the message.
    pub detail: Option<String>,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str, detail: Option<String>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub view: View,
    pub progress: Progress,
    pub text: String,
    /// The file being (or last) extracted. Cleared on reset.
    pub selected_file: Option<PathBuf>,
    /// A drag gesture is over the drop zone.
    pub drag_over: bool,
    pub notice: Option<Notice>,
    /// Short non-blocking status line, e.g. where a download was saved.
    pub status: Option<String>,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DragOver,
    DragLeave,
    FileRejected { declared: String },
    FileAccepted { path: PathBuf },
    Progress { generation: u64, progress: Progress },
    ExtractionComplete { generation: u64, text: String },
    ExtractionFailed { generation: u64, error: String },
    CopyFailed { error: String },
    Saved { path: PathBuf },
    SaveFailed { error: String },
    DismissNotice,
    Reset,
}

impl From<DriverEvent> for SessionEvent {
    fn from(event: DriverEvent) -> Self {
        match event {
            DriverEvent::Progress {
                generation,
                progress,
            } => SessionEvent::Progress {
                generation,
                progress,
            },
            DriverEvent::Complete { generation, text } => {
                SessionEvent::ExtractionComplete { generation, text }
            }
            DriverEvent::Failed { generation, error } => {
                SessionEvent::ExtractionFailed { generation, error }
            }
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is this driver event addressed to the current extraction?
    fn is_current(&self, generation: u64) -> bool {
        self.view == View::Processing && generation == self.generation
    }

    /// Everything cleared, back on Upload, with a fresh generation.
    fn cleared(&self) -> Self {
        Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        }
    }
}

/// Apply `event` to `session`, returning the next state.
pub fn reduce(session: Session, event: SessionEvent) -> Session {
    match event {
        SessionEvent::DragOver if session.view == View::Upload => Session {
            drag_over: true,
            ..session
        },
        SessionEvent::DragOver => session,
        SessionEvent::DragLeave => Session {
            drag_over: false,
            ..session
        },
        SessionEvent::FileRejected { declared } => {
            let detail = if declared.is_empty() {
                Some("unknown file type".to_string())
            } else {
                Some(format!("file type: {declared}"))
            };
            Session {
                drag_over: false,
                notice: Some(Notice::new(
                    NoticeKind::InvalidFileType,
                    INVALID_FILE_TYPE_MESSAGE,
                    detail,
                )),
                ..session
            }
        }
        SessionEvent::FileAccepted { path } if session.view == View::Upload => Session {
            view: View::Processing,
            progress: Progress::new(0, "Loading PDF..."),
            text: String::new(),
            selected_file: Some(path),
            drag_over: false,
            notice: None,
            status: None,
            generation: session.generation.wrapping_add(1),
        },
        SessionEvent::FileAccepted { .. } => session,
        SessionEvent::Progress {
            generation,
            progress,
        } if session.is_current(generation) && progress.percent >= session.progress.percent => {
            Session {
                progress,
                ..session
            }
        }
        SessionEvent::Progress { .. } => session,
        SessionEvent::ExtractionComplete { generation, text } if session.is_current(generation) => {
            Session {
                view: View::Results,
                progress: Progress::new(100, "Complete!"),
                text,
                ..session
            }
        }
        SessionEvent::ExtractionComplete { .. } => session,
        SessionEvent::ExtractionFailed { generation, error } if session.is_current(generation) => {
            Session {
                notice: Some(Notice::new(
                    NoticeKind::ProcessingFailed,
                    PROCESSING_FAILED_MESSAGE,
                    Some(error),
                )),
                ..session.cleared()
            }
        }
        SessionEvent::ExtractionFailed { .. } => session,
        SessionEvent::CopyFailed { error } => Session {
            notice: Some(Notice::new(
                NoticeKind::ClipboardFailed,
                CLIPBOARD_FAILED_MESSAGE,
                Some(error),
            )),
            ..session
        },
        SessionEvent::Saved { path } => Session {
            status: Some(format!("Saved to {}", path.display())),
            ..session
        },
        SessionEvent::SaveFailed { error } => Session {
            notice: Some(Notice::new(
                NoticeKind::SaveFailed,
                SAVE_FAILED_MESSAGE,
                Some(error),
            )),
            ..session
        },
        SessionEvent::DismissNotice => Session {
            notice: None,
            ..session
        },
        SessionEvent::Reset => session.cleared(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processing(generation_bump: u64) -> Session {
        let mut s = Session::new();
        s.generation = generation_bump;
        reduce(
            s,
            SessionEvent::FileAccepted {
                path: PathBuf::from("paper.pdf"),
            },
        )
    }

    #[test]
    fn starts_on_upload_and_empty() {
        let s = Session::new();
        assert_eq!(s.view, View::Upload);
        assert!(s.text.is_empty());
        assert_eq!(s.progress, Progress::default());
    }

    #[test]
    fn accepted_file_moves_to_processing() {
        let s = processing(0);
        assert_eq!(s.view, View::Processing);
        assert_eq!(s.progress, Progress::new(0, "Loading PDF..."));
        assert_eq!(s.selected_file, Some(PathBuf::from("paper.pdf")));
        assert_eq!(s.generation, 1);
    }

    #[test]
    fn rejected_file_keeps_upload_and_notifies() {
        let s = reduce(Session::new(), SessionEvent::DragOver);
        assert!(s.drag_over);
        let s = reduce(
            s,
            SessionEvent::FileRejected {
                declared: "text/plain".into(),
            },
        );
        assert_eq!(s.view, View::Upload);
        assert!(!s.drag_over);
        let notice = s.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::InvalidFileType);
        assert_eq!(notice.message, INVALID_FILE_TYPE_MESSAGE);
        assert_eq!(s.generation, 0);
    }

    #[test]
    fn drag_over_only_on_upload() {
        let s = reduce(processing(0), SessionEvent::DragOver);
        assert!(!s.drag_over);
    }

    #[test]
    fn second_file_while_processing_is_ignored() {
        let s = processing(0);
        let s2 = reduce(
            s.clone(),
            SessionEvent::FileAccepted {
                path: PathBuf::from("other.pdf"),
            },
        );
        assert_eq!(s, s2);
    }

    #[test]
    fn progress_never_goes_backwards() {
        let s = processing(0);
        let g = s.generation;
        let s = reduce(
            s,
            SessionEvent::Progress {
                generation: g,
                progress: Progress::new(40, "Extracting text..."),
            },
        );
        let s = reduce(
            s,
            SessionEvent::Progress {
                generation: g,
                progress: Progress::new(20, "late"),
            },
        );
        assert_eq!(s.progress.percent, 40);
        assert_eq!(s.progress.message, "Extracting text...");
    }

    #[test]
    fn complete_moves_to_results() {
        let s = processing(0);
        let g = s.generation;
        let s = reduce(
            s,
            SessionEvent::ExtractionComplete {
                generation: g,
                text: "--- Page 1 ---\n\nhi".into(),
            },
        );
        assert_eq!(s.view, View::Results);
        assert_eq!(s.progress, Progress::new(100, "Complete!"));
        assert_eq!(s.text, "--- Page 1 ---\n\nhi");
    }

    #[test]
    fn failure_resets_with_notice() {
        let s = processing(0);
        let g = s.generation;
        let s = reduce(
            s,
            SessionEvent::ExtractionFailed {
                generation: g,
                error: "failed to open PDF: broken".into(),
            },
        );
        assert_eq!(s.view, View::Upload);
        assert!(s.text.is_empty());
        assert!(s.selected_file.is_none());
        assert_eq!(s.progress, Progress::default());
        assert_eq!(s.notice.unwrap().kind, NoticeKind::ProcessingFailed);
    }

    #[test]
    fn stale_events_after_reset_are_ignored() {
        let s = processing(0);
        let old = s.generation;
        let s = reduce(s, SessionEvent::Reset);
        assert_eq!(s.view, View::Upload);

        let s = reduce(
            s,
            SessionEvent::ExtractionComplete {
                generation: old,
                text: "late".into(),
            },
        );
        assert_eq!(s.view, View::Upload);
        assert!(s.text.is_empty());

        let s = reduce(
            s,
            SessionEvent::FileAccepted {
                path: PathBuf::from("next.pdf"),
            },
        );
        let s = reduce(
            s,
            SessionEvent::Progress {
                generation: old,
                progress: Progress::new(90, "old"),
            },
        );
        assert_eq!(s.progress.percent, 0);
    }

    #[test]
    fn reset_clears_everything_from_any_view() {
        let upload = Session::new();
        let proc = processing(3);
        let g = proc.generation;
        let results = reduce(
            proc.clone(),
            SessionEvent::ExtractionComplete {
                generation: g,
                text: "x".into(),
            },
        );

        for s in [upload, proc, results] {
            let before = s.generation;
            let r = reduce(s, SessionEvent::Reset);
            assert_eq!(r.view, View::Upload);
            assert!(r.text.is_empty());
            assert_eq!(r.progress, Progress::default());
            assert!(r.selected_file.is_none());
            assert!(r.notice.is_none());
            assert_eq!(r.generation, before + 1);
        }
    }

    #[test]
    fn copy_failure_and_dismiss() {
        let s = reduce(
            Session::new(),
            SessionEvent::CopyFailed {
                error: "broken pipe".into(),
            },
        );
        assert_eq!(s.notice.as_ref().unwrap().message, CLIPBOARD_FAILED_MESSAGE);
        let s = reduce(s, SessionEvent::DismissNotice);
        assert!(s.notice.is_none());
    }

    #[test]
    fn driver_events_convert() {
        let ev: SessionEvent = DriverEvent::Complete {
            generation: 7,
            text: "t".into(),
        }
        .into();
        assert_eq!(
            ev,
            SessionEvent::ExtractionComplete {
                generation: 7,
                text: "t".into()
            }
        );
    }
}
