use slint::Weak;
use snip_core::sink::DisplaySurface;

use crate::ControlWindow;

/// The control window's result box
pub struct WindowDisplay {
    window: Weak<ControlWindow>,
}

impl WindowDisplay {
    pub fn new(window: Weak<ControlWindow>) -> Self {
        Self { window }
    }
}

impl DisplaySurface for WindowDisplay {
    fn show(&mut self, text: &str) {
        if let Some(w) = self.window.upgrade() {
            w.set_result_text(text.into());
        }
    }
}
