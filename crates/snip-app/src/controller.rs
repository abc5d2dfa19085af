use std::path::PathBuf;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snip_config::Config;
use snip_core::dispatch::Dispatcher;
use snip_core::types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watch_hotkey;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(16),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    config: Arc<Config>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            channels: ChannelSet::new(),
            config,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Receiver for backend events and sender for UI requests
    pub fn ui_endpoints(&self) -> (AsyncReceiver<AppEvent>, AsyncSender<AppEvent>) {
        (
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
        )
    }

    pub fn spawn_tasks<L>(&self, loader: L) -> JoinSet<anyhow::Result<()>>
    where
        L: FnOnce() -> anyhow::Result<Dispatcher> + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        let debug_dir: PathBuf = self.config.debug.dir.clone();
        tasks.spawn(event_loop(
            loader,
            debug_dir,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        if self.config.hotkey.enabled {
            tasks.spawn(watch_hotkey(
                self.cancel_token.child_token(),
                self.channels.app_to_ui.0.clone(),
            ));
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
