mod capture;
mod command;
mod hotkey;
mod markup;
mod temp_file;
mod tesseract;

pub use capture::XcapCapturer;
pub use hotkey::HotkeyManager;
pub use markup::CommandMarkupEngine;
pub use temp_file::TempPng;
pub use tesseract::TesseractEngine;

use std::sync::Arc;

use anyhow::Context;
use snip_config::Config;
use snip_core::dispatch::Dispatcher;

/// Load both recognition engines.
///
/// A markup engine that cannot be started is an error; a missing OCR engine
/// only leaves text mode unavailable.
pub fn init_engines(config: &Config) -> anyhow::Result<Dispatcher> {
    let markup = CommandMarkupEngine::new(config.math.command.clone(), config.math.args.clone())
        .context("Failed to load LaTeX model")?;
    let mut dispatcher = Dispatcher::new().with_markup(Arc::new(markup));

    let tesseract = TesseractEngine::new(config.ocr.tesseract_cmd.clone());
    if tesseract.available() {
        dispatcher = dispatcher.with_text(Arc::new(tesseract));
    } else {
        tracing::warn!(
            command = %config.ocr.tesseract_cmd,
            "Tesseract not found, text OCR disabled"
        );
    }

    Ok(dispatcher)
}
