use snip_core::capture::{ScreenCapturer, Snapshot};
use snip_core::error::CaptureError;
use xcap::Monitor;

/// Grabs the primary monitor through xcap
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapturer;

impl ScreenCapturer for XcapCapturer {
    fn capture_full_display(&self) -> Result<Snapshot, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Denied(e.to_string()))?;
        let monitor = monitors
            .iter()
            .find(|m| m.is_primary())
            .or_else(|| monitors.first())
            .ok_or(CaptureError::NoDisplay)?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Denied(e.to_string()))?;
        let (width, height) = (image.width(), image.height());
        tracing::debug!(width, height, "Captured primary monitor");

        Snapshot::from_raw(width, height, image.into_raw())
            .ok_or_else(|| CaptureError::Denied("monitor returned a malformed frame".into()))
    }
}
