use std::cell::RefCell;
use std::time::Duration;

use slint::Weak;
use snip_core::capture::ScreenCapturer;
use snip_core::session::{Phase, Pipeline};

use crate::bridge::UiBridge;
use crate::status;
use crate::{ControlWindow, SelectionOverlay};

/// Everything the UI callbacks share. Lives on the UI thread only.
pub struct UiState {
    pub pipeline: RefCell<Pipeline>,
    pub control: Weak<ControlWindow>,
    pub overlay: Weak<SelectionOverlay>,
    pub capturer: Box<dyn ScreenCapturer>,
    pub bridge: UiBridge,
    pub overlay_dim: f32,
    pub hide_delay: Duration,
}

impl UiState {
    pub fn set_status(&self, text: &str, ok: bool) {
        if let Some(w) = self.control.upgrade() {
            w.set_status(text.into());
            w.set_status_ok(ok);
        }
    }

    pub fn set_result_text(&self, text: &str) {
        if let Some(w) = self.control.upgrade() {
            w.set_result_text(text.into());
        }
    }

    /// Ready line for the loaded engines; nothing while still loading
    pub fn show_idle_status(&self) {
        let backends = self.pipeline.borrow().backends();
        if let Some(backends) = backends {
            self.set_status(status::ready_text(backends), true);
        }
    }

    /// Push the pipeline phase to the control window buttons
    pub fn sync_controls(&self) {
        let view = self.pipeline.borrow().view();
        if let Some(w) = self.control.upgrade() {
            w.set_is_ready(view.backends.is_some());
            w.set_is_busy(matches!(
                view.phase,
                Phase::Arming | Phase::Selecting | Phase::Recognizing
            ));
            w.set_has_result(view.has_result);
        }
    }
}
