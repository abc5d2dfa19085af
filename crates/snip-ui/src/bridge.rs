use kanal::{AsyncReceiver, AsyncSender};
use snip_core::types::AppEvent;

/// UI-thread end of the channels to the async backend
pub struct UiBridge {
    to_app: AsyncSender<AppEvent>,
}

impl UiBridge {
    pub fn new(to_app: AsyncSender<AppEvent>) -> Self {
        Self { to_app }
    }

    /// Queue an event for the backend without blocking the event loop
    pub fn send(&self, event: AppEvent) {
        let tx = self.to_app.clone();
        let spawned = slint::spawn_local(async move {
            if let Err(e) = tx.send(event).await {
                tracing::error!("Failed to send event to backend: {e}");
            }
        });
        if let Err(e) = spawned {
            tracing::error!("Failed to schedule event for backend: {e}");
        }
    }

    /// Deliver backend events to `handler` on the UI thread, until the channel closes
    pub fn listen(
        from_app: AsyncReceiver<AppEvent>,
        handler: impl Fn(AppEvent) + 'static,
    ) -> Result<(), slint::EventLoopError> {
        slint::spawn_local(async move {
            while let Ok(event) = from_app.recv().await {
                handler(event);
            }
            tracing::debug!("Backend channel closed");
        })?;
        Ok(())
    }
}
