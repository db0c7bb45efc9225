use cipherdocs_core::{SessionEvent, View};

use super::App;
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if action == Action::ForceQuit {
            self.should_quit = true;
            return true;
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                Action::Tick => self.on_tick(),
                Action::Resize(_w, h) => self.on_resize(h),
                _ => {}
            }
            return false;
        }

        // A notice blocks everything until dismissed
        if self.session.notice.is_some() {
            match action {
                Action::DrillIn | Action::NavigateBack => {
                    self.apply(SessionEvent::DismissNotice);
                }
                Action::Tick => self.on_tick(),
                Action::Resize(_w, h) => self.on_resize(h),
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                }
                Action::Quit => {
                    self.show_help = false;
                    self.confirm_quit = true;
                }
                Action::Tick => self.on_tick(),
                Action::Resize(_w, h) => self.on_resize(h),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::Tick => self.on_tick(),
            Action::Resize(_w, h) => self.on_resize(h),
            action => match self.session.view {
                View::Upload => self.handle_upload_action(action),
                View::Processing => self.handle_processing_action(action),
                View::Results => self.handle_results_action(action),
            },
        }
        false
    }

    fn on_resize(&mut self, height: u16) {
        // header, directory line, list borders, drop zone, footer
        self.visible_rows = (height as usize).saturating_sub(11);
    }

    fn handle_processing_action(&mut self, action: Action) {
        match action {
            Action::NavigateBack | Action::NewFile => self.reset(),
            _ => {}
        }
    }
}
