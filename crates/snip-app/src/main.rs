use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use snip_io::clipboard::ArboardClipboard;
use snip_ocr::XcapCapturer;
use snip_ui::UiOptions;

use crate::cli::Cli;
use crate::controller::AppController;
use crate::logging::init_logging;
use crate::profile::ProfileStore;

mod cli;
mod controller;
mod events;
mod io;
mod logging;
mod profile;


fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    if let Some(name) = &cli.new_profile {
        return create_profile(name);
    }

    let mut config = load_config(&cli.profile);
    config.apply_env();
    cli.apply(&mut config);
    let settings = cli.settings(&config);
    tracing::info!(mode = %settings.mode, languages = %settings.languages, "Starting snip");

    let runtime = tokio::runtime::Runtime::new()?;
    let guard = runtime.enter();

    let config = Arc::new(config);
    let controller = AppController::new(config.clone());
    let loader_config = config.clone();
    let mut tasks = controller.spawn_tasks(move || snip_ocr::init_engines(&loader_config));

    let (app_to_ui_rx, ui_to_app_tx) = controller.ui_endpoints();
    let options = UiOptions {
        settings,
        languages: config.ocr.languages.clone(),
        overlay_dim: config.capture.overlay_dim,
        hide_delay: Duration::from_millis(config.capture.hide_delay_ms),
    };
    let ui_result = snip_ui::run_ui(
        options,
        Box::new(XcapCapturer),
        Box::new(ArboardClipboard::new()),
        app_to_ui_rx,
        ui_to_app_tx,
    );

    tracing::info!("UI closed, shutting down");
    controller.shutdown();
    runtime.block_on(async {
        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                    Err(e) => tracing::error!("Task panicked: {e}"),
                }
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!("Tasks did not stop in time");
        }
    });
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));

    ui_result
}

fn create_profile(name: &str) -> anyhow::Result<()> {
    let store = ProfileStore::default_location()
        .ok_or_else(|| anyhow::anyhow!("No config directory to store profiles in"))?;
    store.init()?;
    let path = store.add_from_main(name)?;
    println!("Created profile {name} at {}", path.display());
    Ok(())
}

/// Profile from disk, or defaults when there is no usable profile
fn load_config(profile: &str) -> snip_config::Config {
    let Some(store) = ProfileStore::default_location() else {
        tracing::warn!("No config directory, using defaults");
        return snip_config::Config::default();
    };

    if let Err(e) = store.init() {
        tracing::warn!("Failed to initialise profiles: {e:#}");
    }

    match store.load(profile) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load profile {profile}: {e:#}, using defaults");
            snip_config::Config::default()
        }
    }
}
