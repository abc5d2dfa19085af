use snip_types::Mode;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No display found")]
    NoDisplay,

    #[error("Screen capture denied: {0}")]
    Denied(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("Cannot preprocess an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{mode} recognition engine is not available")]
    Unavailable { mode: Mode },

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Recognition cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Recognition engines are still loading")]
    NotReady,

    #[error("A capture is already in progress")]
    Busy,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
