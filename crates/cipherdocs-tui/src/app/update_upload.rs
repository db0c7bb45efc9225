use ratatui::layout::{Position, Rect};

use cipherdocs_core::{SessionEvent, parse_dropped_paths};

use super::App;
use crate::action::Action;

fn contains(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.is_some_and(|a| a.contains(Position::new(x, y)))
}

impl App {
    /// Handle input while on the upload screen.
    pub(super) fn handle_upload_action(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                let max = self.file_picker.entries.len().saturating_sub(1);
                if self.file_picker.cursor < max {
                    self.file_picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                let max = self.file_picker.entries.len().saturating_sub(1);
                self.file_picker.cursor = (self.file_picker.cursor + page).min(max);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(page);
            }
            Action::GoTop => {
                self.file_picker.cursor = 0;
            }
            Action::GoBottom => {
                self.file_picker.cursor = self.file_picker.entries.len().saturating_sub(1);
            }
            Action::DrillIn => {
                // Enter on directory opens it, on a file submits it
                if !self.file_picker.enter_directory()
                    && let Some(entry) = self.file_picker.current()
                {
                    let path = entry.path.clone();
                    self.submit_files(vec![path]);
                }
            }
            Action::NavigateBack => {
                self.file_picker.go_up();
            }
            Action::Paste(text) => {
                self.apply(SessionEvent::DragLeave);
                let paths = parse_dropped_paths(&text);
                tracing::debug!(count = paths.len(), "paths dropped");
                self.submit_files(paths);
            }
            Action::DragAt(x, y) => {
                if contains(self.last_drop_zone, x, y) {
                    if !self.session.drag_over {
                        self.apply(SessionEvent::DragOver);
                    }
                } else if self.session.drag_over {
                    self.apply(SessionEvent::DragLeave);
                }
            }
            Action::DragEnd => {
                if self.session.drag_over {
                    self.apply(SessionEvent::DragLeave);
                }
            }
            Action::ClickAt(x, y) => self.handle_click(x, y),
            _ => {}
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        let Some(list) = self.last_list_area else {
            return;
        };
        if !contains(Some(list), x, y) {
            return;
        }
        // Account for the top border
        if y <= list.y {
            return;
        }
        let visible = list.height.saturating_sub(2) as usize;
        let scroll_offset = if self.file_picker.cursor >= visible {
            self.file_picker.cursor - visible + 1
        } else {
            0
        };
        let row = scroll_offset + (y - list.y - 1) as usize;
        if row < self.file_picker.entries.len() {
            self.file_picker.cursor = row;
        }
    }
}
