//! Check which engines this machine can run - `cargo run -p snip-ocr --bin check_engines [out.png]`

use anyhow::Result;
use snip_config::Config;
use snip_core::capture::ScreenCapturer;
use snip_ocr::{TesseractEngine, XcapCapturer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::new();

    let tesseract = TesseractEngine::new(config.ocr.tesseract_cmd.clone());
    match tesseract.version() {
        Some(version) => tracing::info!("Tesseract: {version}"),
        None => tracing::warn!("Tesseract: not available ({})", config.ocr.tesseract_cmd),
    }

    match snip_ocr::init_engines(&config) {
        Ok(dispatcher) => {
            let status = dispatcher.availability();
            tracing::info!(math = status.math, text = status.text, "Engines loaded");
        }
        Err(e) => tracing::error!("{e:#}"),
    }

    let start = std::time::Instant::now();
    let snapshot = XcapCapturer.capture_full_display()?;
    tracing::info!(
        "Captured {}x{} in {:?}",
        snapshot.width(),
        snapshot.height(),
        start.elapsed()
    );

    if let Some(out) = std::env::args().nth(1) {
        snapshot.image().save(&out)?;
        tracing::info!("Saved to {out}");
    }

    Ok(())
}
