use std::time::Instant;

use cipherdocs_core::SessionEvent;
use cipherdocs_core::actions::{self, copy_to_clipboard};

use super::App;
use crate::action::Action;

impl App {
    /// Handle input while on the results screen.
    pub(super) fn handle_results_action(&mut self, action: Action) {
        match action {
            Action::MoveDown => self.scroll_results(1),
            Action::MoveUp => self.scroll_results(-1),
            Action::PageDown => self.scroll_results(self.results_page() as i64),
            Action::PageUp => self.scroll_results(-(self.results_page() as i64)),
            Action::GoTop => {
                self.results_scroll = 0;
            }
            Action::GoBottom => {
                self.results_scroll = self.max_results_scroll();
            }
            Action::Copy => self.copy_text(),
            Action::Download => self.download_text(),
            Action::NewFile => self.reset(),
            _ => {}
        }
    }

    fn results_page(&self) -> usize {
        self.last_text_area
            .map(|area| area.height as usize)
            .unwrap_or(self.visible_rows)
            .max(1)
    }

    /// Highest scroll offset that still fills the text box.
    ///
    /// Counted in wrapped rows at the last rendered width; before the first
    /// render, in text lines.
    fn max_results_scroll(&self) -> u16 {
        let max = match self.last_text_area {
            Some(area) => crate::view::results::wrapped_height(&self.session.text, area.width)
                .saturating_sub(area.height as usize),
            None => self.session.text.lines().count().saturating_sub(1),
        };
        max.min(u16::MAX as usize) as u16
    }

    fn scroll_results(&mut self, delta: i64) {
        let next = (self.results_scroll as i64 + delta).clamp(0, self.max_results_scroll() as i64);
        self.results_scroll = next as u16;
    }

    fn copy_text(&mut self) {
        match copy_to_clipboard(&mut self.clipboard, &self.session.text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + self.settings.copy_feedback);
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.apply(SessionEvent::CopyFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    fn download_text(&mut self) {
        match actions::save_text(
            &self.settings.download_dir,
            actions::today(),
            &self.session.text,
        ) {
            Ok(path) => self.apply(SessionEvent::Saved { path }),
            Err(e) => {
                tracing::warn!(error = %e, "download failed");
                self.apply(SessionEvent::SaveFailed {
                    error: e.to_string(),
                });
            }
        }
    }
}
