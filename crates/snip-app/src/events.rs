use std::path::PathBuf;

use kanal::{AsyncReceiver, AsyncSender};
use snip_core::dispatch::Dispatcher;
use snip_core::error::DispatchError;
use snip_core::preprocess::NoopObserver;
use snip_core::session::{JobOutcome, RecognitionJob};
use snip_core::types::AppEvent;
use snip_io::debug_dump::DebugDumpObserver;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Backend main loop: load the engines, then run recognition jobs sent by the UI
pub async fn event_loop<L>(
    loader: L,
    debug_dir: PathBuf,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    L: FnOnce() -> anyhow::Result<Dispatcher> + Send + 'static,
{
    let dispatcher = load_engines(loader, &app_to_ui_tx).await?;

    tracing::info!("[EVENT_LOOP] Waiting for events");
    let mut jobs = JoinSet::new();
    let mut result: anyhow::Result<()> = Ok(());
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            Some(joined) = jobs.join_next() => {
                if let Err(e) = joined {
                    tracing::error!("[EVENT_LOOP] Recognition task failed: {e}");
                }
                continue;
            }
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(e) => {
                    result = Err(e.into());
                    break;
                }
            },
        };

        match event {
            AppEvent::Recognize(job) => {
                jobs.spawn(handle_job(
                    job,
                    dispatcher.clone(),
                    debug_dir.clone(),
                    app_to_ui_tx.clone(),
                    cancel.clone(),
                ));
            }
            AppEvent::Shutdown => {
                tracing::info!("[EVENT_LOOP] Shutdown requested");
                break;
            }
            other => {
                tracing::debug!(
                    "[EVENT_LOOP] Ignoring {:?}",
                    std::mem::discriminant(&other)
                );
            }
        }
    }

    // In-flight jobs stop at their next checkpoint once the token fires.
    cancel.cancel();
    while jobs.join_next().await.is_some() {}

    result
}

/// Run the loader off the async threads and report the outcome to the UI.
/// A failed load leaves an empty dispatcher so every job reports unavailable.
async fn load_engines<L>(loader: L, app_to_ui_tx: &AsyncSender<AppEvent>) -> anyhow::Result<Dispatcher>
where
    L: FnOnce() -> anyhow::Result<Dispatcher> + Send + 'static,
{
    let (dispatcher, event) = match tokio::task::spawn_blocking(loader).await? {
        Ok(dispatcher) => {
            let backends = dispatcher.availability();
            tracing::info!(math = backends.math, text = backends.text, "Engines loaded");
            (dispatcher, AppEvent::BackendReady(backends))
        }
        Err(e) => {
            tracing::error!("Engine initialisation failed: {e:#}");
            (Dispatcher::new(), AppEvent::BackendFailed(failure_detail(&e)))
        }
    };

    app_to_ui_tx.send(event).await?;
    Ok(dispatcher)
}

/// The error chain below the outermost context, which the UI already prints
fn failure_detail(error: &anyhow::Error) -> String {
    let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
    if causes.is_empty() {
        error.to_string()
    } else {
        causes.join(": ")
    }
}

async fn handle_job(
    job: RecognitionJob,
    dispatcher: Dispatcher,
    debug_dir: PathBuf,
    app_to_ui_tx: AsyncSender<AppEvent>,
    shutdown: CancellationToken,
) {
    let id = job.id;
    let job_cancel = job.cancel.clone();
    let worker = tokio::task::spawn_blocking(move || {
        if job.debug {
            let mut observer = DebugDumpObserver::new(debug_dir);
            job.run(&dispatcher, &mut observer)
        } else {
            job.run(&dispatcher, &mut NoopObserver)
        }
    });

    let joined = tokio::select! {
        joined = worker => joined,
        _ = shutdown.cancelled() => {
            tracing::info!(id, "Shutting down, cancelling recognition");
            job_cancel.cancel();
            return;
        }
    };

    let outcome = joined.unwrap_or_else(|e| {
        tracing::error!(id, "Recognition worker died: {e}");
        JobOutcome {
            id,
            result: Err(DispatchError::RecognitionFailed(e.to_string())),
        }
    });

    if let Err(e) = app_to_ui_tx.send(AppEvent::RecognitionFinished(outcome)).await {
        tracing::error!(id, "Failed to send result to UI: {e}");
    }
}
