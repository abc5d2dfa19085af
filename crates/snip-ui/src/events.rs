use std::rc::Rc;

use snip_core::types::AppEvent;

use crate::actions;
use crate::state::UiState;
use crate::status;

/// Backend -> UI events, handled on the slint event loop
pub fn handle_event(state: &Rc<UiState>, event: AppEvent) {
    match event {
        AppEvent::BackendReady(backends) => {
            state.pipeline.borrow_mut().mark_ready(backends);
            state.set_status(status::ready_text(backends), true);
            if let Some(w) = state.control.upgrade() {
                w.set_info_text(status::info_text(backends).into());
            }
            state.sync_controls();
        }
        AppEvent::BackendFailed(message) => {
            tracing::debug!("[UI] Backend failed");
            state.set_status(&format!("Failed to load LaTeX model: {message}"), false);
        }
        AppEvent::RecognitionFinished(outcome) => {
            let published = state
                .pipeline
                .borrow_mut()
                .complete(outcome)
                .map(|result| result.is_some());

            match published {
                Ok(true) => state.set_status(status::COPIED_TO_CLIPBOARD, true),
                Ok(false) => state.show_idle_status(),
                Err(e) => {
                    state.set_status(status::PROCESSING_ERROR, false);
                    state.set_result_text(&format!("Error processing image: {e}"));
                }
            }
            state.sync_controls();
        }
        AppEvent::HotkeyPressed => {
            tracing::debug!("[UI] Hotkey pressed");
            actions::start_capture(state);
        }
        AppEvent::Shutdown => {
            slint::quit_event_loop().ok();
        }
        AppEvent::Recognize(job) => {
            tracing::warn!(id = job.id, "[UI] Recognition job sent to the UI, dropping it");
        }
    }
}
