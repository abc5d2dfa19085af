//! Texts shown in the control window

use snip_types::BackendStatus;

pub const LOADING: &str = "Loading AI...";
pub const PROCESSING: &str = "Processing...";
pub const COPIED_TO_CLIPBOARD: &str = "✓ Copied to clipboard!";
pub const COPIED: &str = "✓ Copied!";
pub const PROCESSING_ERROR: &str = "✗ Error processing image";
pub const TESSERACT_MISSING: &str = "⚠ Tesseract not found";

pub const TESSERACT_GUIDANCE: &str = "Text OCR requires Tesseract.\n\n\
    Install it and make sure `tesseract` is on PATH, or point TESSERACT_CMD at the executable.\n\
    Windows builds: https://github.com/UB-Mannheim/tesseract/wiki";

pub fn ready_text(backends: BackendStatus) -> &'static str {
    if backends.text {
        "✓ Ready (LaTeX + Text OCR)"
    } else {
        "✓ Ready (LaTeX only)"
    }
}

pub fn info_text(backends: BackendStatus) -> &'static str {
    if backends.text {
        "LaTeX mode: Math equations | Text mode: Multilingual OCR"
    } else {
        "⚠️ Install Tesseract for text OCR (or set TESSERACT_CMD)"
    }
}
