use std::time::Duration;

use kanal::AsyncSender;
use snip_core::types::AppEvent;
use snip_ocr::HotkeyManager;
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Forward global hotkey presses to the UI until cancelled
pub async fn watch_hotkey(
    cancel: CancellationToken,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || {
        let hotkey = match HotkeyManager::new() {
            Ok(hotkey) => hotkey,
            Err(e) => {
                tracing::warn!("Global hotkey unavailable: {e:#}");
                return;
            }
        };
        tracing::info!("Hotkey listener started (Ctrl+Shift+S)");

        while !cancel.is_cancelled() {
            if hotkey.poll() {
                tracing::debug!("Capture hotkey pressed");
                match app_to_ui_tx.try_send(AppEvent::HotkeyPressed) {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!("UI queue full, dropping hotkey press"),
                    Err(e) => {
                        tracing::error!("Failed to forward hotkey: {e}");
                        break;
                    }
                }
            }

            std::thread::sleep(POLL_INTERVAL);
        }

        tracing::info!("Hotkey listener stopping");
    })
    .await?;

    Ok(())
}
