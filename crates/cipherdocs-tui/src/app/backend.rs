use cipherdocs_core::View;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update session state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let was_processing = self.session.view == View::Processing;
        self.apply(event.into());
        if was_processing && self.session.view == View::Results {
            self.results_scroll = 0;
        }
    }
}
