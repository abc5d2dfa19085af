use arboard::Clipboard;
use snip_core::sink::ClipboardSink;

/// System clipboard. The handle is kept open so X11/Wayland selections outlive the copy call.
pub struct ArboardClipboard {
    clipboard: Option<Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self {
            clipboard: open(),
        }
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn open() -> Option<Clipboard> {
    match Clipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            tracing::error!("Failed to open clipboard: {e}");
            None
        }
    }
}

impl ClipboardSink for ArboardClipboard {
    fn copy(&mut self, text: &str) {
        if self.clipboard.is_none() {
            self.clipboard = open();
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return;
        };

        match clipboard.set_text(text.to_owned()) {
            Ok(()) => tracing::debug!(chars = text.chars().count(), "Copied to clipboard"),
            Err(e) => tracing::error!("Failed to copy to clipboard: {e}"),
        }
    }
}
