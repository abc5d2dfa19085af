use snip_types::BackendStatus;

use crate::session::{JobOutcome, RecognitionJob};

/// Messages exchanged between the UI thread and the backend tasks
#[derive(Debug)]
pub enum AppEvent {
    /// Engine initialisation finished; which modes can be used
    BackendReady(BackendStatus),
    /// The math engine could not be loaded
    BackendFailed(String),
    /// UI -> backend: run a job off the UI thread
    Recognize(RecognitionJob),
    /// backend -> UI
    RecognitionFinished(JobOutcome),
    HotkeyPressed,
    Shutdown,
}
