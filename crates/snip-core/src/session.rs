//! The pipeline record driven by the UI thread.
//!
//! `Pipeline` owns everything a capture needs (settings, engine readiness,
//! the live session and the result sink) and only ever moves between
//! `Idle -> Arming -> Selecting -> Recognizing -> Idle`. Recognition itself happens
//! elsewhere: `handle_pointer` hands out a [`RecognitionJob`] and the caller
//! returns its [`JobOutcome`] through [`Pipeline::complete`].

use image::DynamicImage;
use snip_types::{BackendStatus, LanguageSet, Mode, ProcessedResult, RecognitionResult};
use tokio_util::sync::CancellationToken;

use crate::capture::{ScreenCapturer, Snapshot};
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, PipelineError};
use crate::overlay::{OverlayOutcome, PointerEvent, SelectionOverlay};
use crate::postprocess::process;
use crate::preprocess::{StageObserver, preprocess};
use crate::sink::ResultSink;

/// User-controlled options, read when a session starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub languages: LanguageSet,
    pub plain_text: bool,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Math,
            languages: LanguageSet::default(),
            plain_text: true,
            debug: false,
        }
    }
}

/// One capture: the frozen screen and the overlay drawn over it
#[derive(Debug)]
pub struct CaptureSession {
    mode: Mode,
    languages: LanguageSet,
    snapshot: Snapshot,
    overlay: SelectionOverlay,
}

impl CaptureSession {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn overlay(&self) -> &SelectionOverlay {
        &self.overlay
    }

    pub fn hint(&self) -> String {
        format!(
            "Select {} to recognize (ESC to cancel)",
            self.mode.target_noun()
        )
    }
}

/// Cropped image plus everything needed to recognize it off the UI thread
#[derive(Debug)]
pub struct RecognitionJob {
    pub id: u64,
    pub mode: Mode,
    pub languages: LanguageSet,
    pub image: DynamicImage,
    pub debug: bool,
    pub cancel: CancellationToken,
}

impl RecognitionJob {
    /// Preprocess and recognize. Blocking; run it on a worker.
    pub fn run(&self, dispatcher: &Dispatcher, observer: &mut dyn StageObserver) -> JobOutcome {
        let span = tracing::debug_span!("job", id = self.id, mode = %self.mode);
        let _guard = span.enter();

        JobOutcome {
            id: self.id,
            result: self.execute(dispatcher, observer),
        }
    }

    fn execute(
        &self,
        dispatcher: &Dispatcher,
        observer: &mut dyn StageObserver,
    ) -> Result<RecognitionResult, DispatchError> {
        self.check_cancelled()?;

        let prepared = preprocess(self.mode, &self.image, observer)
            .map_err(|e| DispatchError::RecognitionFailed(e.to_string()))?;
        tracing::debug!(width = prepared.width(), height = prepared.height(), "Image prepared");
        self.check_cancelled()?;

        let result = dispatcher.dispatch(&prepared, self.mode, &self.languages)?;
        self.check_cancelled()?;
        Ok(result)
    }

    fn check_cancelled(&self) -> Result<(), DispatchError> {
        if self.cancel.is_cancelled() {
            Err(DispatchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub id: u64,
    pub result: Result<RecognitionResult, DispatchError>,
}

/// What a pointer event led to
#[derive(Debug)]
pub enum SelectionStep {
    /// Still selecting, or the event was ignored
    Pending,
    /// Back to idle without recognizing anything
    Cancelled,
    Recognize(RecognitionJob),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Idle,
    /// Claimed, waiting for the control window to hide before grabbing the screen
    Arming,
    Selecting,
    Recognizing,
}

/// Read-only picture of the pipeline for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineView {
    pub phase: Phase,
    pub settings: Settings,
    pub backends: Option<BackendStatus>,
    pub has_result: bool,
}

impl PipelineView {
    pub fn can_start(&self) -> bool {
        self.phase == Phase::Idle
    }
}

enum Stage {
    Idle,
    Arming,
    Selecting(CaptureSession),
    Recognizing { job_id: u64, cancel: CancellationToken },
}

pub struct Pipeline {
    settings: Settings,
    backends: Option<BackendStatus>,
    stage: Stage,
    sink: ResultSink,
    next_job_id: u64,
}

impl Pipeline {
    pub fn new(settings: Settings, sink: ResultSink) -> Self {
        Self {
            settings,
            backends: None,
            stage: Stage::Idle,
            sink,
            next_job_id: 1,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Takes effect from the next capture
    pub fn set_mode(&mut self, mode: Mode) {
        self.settings.mode = mode;
    }

    pub fn set_languages(&mut self, languages: LanguageSet) {
        self.settings.languages = languages;
    }

    pub fn set_plain_text(&mut self, plain_text: bool) {
        self.settings.plain_text = plain_text;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.settings.debug = debug;
    }

    pub fn mark_ready(&mut self, backends: BackendStatus) {
        tracing::info!(math = backends.math, text = backends.text, "Recognition engines ready");
        self.backends = Some(backends);
    }

    pub fn backends(&self) -> Option<BackendStatus> {
        self.backends
    }

    pub fn view(&self) -> PipelineView {
        let phase = match (&self.stage, self.backends) {
            (_, None) => Phase::Loading,
            (Stage::Idle, _) => Phase::Idle,
            (Stage::Arming, _) => Phase::Arming,
            (Stage::Selecting(_), _) => Phase::Selecting,
            (Stage::Recognizing { .. }, _) => Phase::Recognizing,
        };

        PipelineView {
            phase,
            settings: self.settings.clone(),
            backends: self.backends,
            has_result: self.sink.latest().is_some(),
        }
    }

    /// Whether a capture may start right now, with the current mode
    pub fn ensure_can_start(&self) -> Result<(), PipelineError> {
        let Some(backends) = self.backends else {
            return Err(PipelineError::NotReady);
        };
        if !matches!(self.stage, Stage::Idle) {
            return Err(PipelineError::Busy);
        }
        if !backends.supports(self.settings.mode) {
            tracing::warn!(mode = %self.settings.mode, "Engine for this mode is not available");
            return Err(DispatchError::Unavailable {
                mode: self.settings.mode,
            }
            .into());
        }
        Ok(())
    }

    /// Reserve the next capture so nothing else can start while the screen grab is pending
    pub fn arm(&mut self) -> Result<(), PipelineError> {
        self.ensure_can_start()?;
        tracing::debug!(mode = %self.settings.mode, "Capture armed");
        self.stage = Stage::Arming;
        Ok(())
    }

    /// Grab the screen once and start selecting over it. Works from idle or after [`Pipeline::arm`];
    /// on failure the pipeline is idle again.
    pub fn begin_capture(
        &mut self,
        capturer: &dyn ScreenCapturer,
    ) -> Result<&CaptureSession, PipelineError> {
        if matches!(self.stage, Stage::Arming) {
            self.stage = Stage::Idle;
        }
        self.ensure_can_start()?;

        let snapshot = capturer.capture_full_display().inspect_err(|e| {
            tracing::error!("Screen capture failed: {e}");
        })?;
        tracing::debug!(width = snapshot.width(), height = snapshot.height(), "Display captured");

        self.stage = Stage::Selecting(CaptureSession {
            mode: self.settings.mode,
            languages: self.settings.languages.clone(),
            snapshot,
            overlay: SelectionOverlay::new(),
        });

        match &self.stage {
            Stage::Selecting(session) => Ok(session),
            _ => Err(PipelineError::Busy),
        }
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        match &self.stage {
            Stage::Selecting(session) => Some(session),
            _ => None,
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> SelectionStep {
        let outcome = match &mut self.stage {
            Stage::Selecting(session) => session.overlay.handle(event),
            _ => return SelectionStep::Pending,
        };
        let Some(outcome) = outcome else {
            return SelectionStep::Pending;
        };

        let Stage::Selecting(session) = std::mem::replace(&mut self.stage, Stage::Idle) else {
            return SelectionStep::Pending;
        };
        let CaptureSession {
            mode,
            languages,
            snapshot,
            ..
        } = session;

        let region = match outcome {
            OverlayOutcome::Selected(region) => region,
            OverlayOutcome::Cancelled => {
                tracing::info!("Capture cancelled");
                return SelectionStep::Cancelled;
            }
        };

        let Some(crop) = snapshot.crop(&region) else {
            tracing::warn!(?region, "Selection lies outside the captured display");
            return SelectionStep::Cancelled;
        };
        drop(snapshot);

        let id = self.next_job_id;
        self.next_job_id += 1;
        let cancel = CancellationToken::new();
        self.stage = Stage::Recognizing {
            job_id: id,
            cancel: cancel.clone(),
        };

        tracing::info!(id, %mode, width = region.width(), height = region.height(), "Recognizing selection");
        SelectionStep::Recognize(RecognitionJob {
            id,
            mode,
            languages,
            image: DynamicImage::ImageRgba8(crop),
            debug: self.settings.debug,
            cancel,
        })
    }

    /// Abort whatever is in progress and return to idle
    pub fn cancel(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => {}
            Stage::Arming | Stage::Selecting(_) => tracing::info!("Capture cancelled"),
            Stage::Recognizing { job_id, cancel } => {
                tracing::info!(id = job_id, "Recognition cancelled");
                cancel.cancel();
            }
        }
    }

    /// Accept a finished job. Outcomes for jobs that are no longer current are dropped.
    pub fn complete(
        &mut self,
        outcome: JobOutcome,
    ) -> Result<Option<&ProcessedResult>, PipelineError> {
        match &self.stage {
            Stage::Recognizing { job_id, .. } if *job_id == outcome.id => {}
            _ => {
                tracing::debug!(id = outcome.id, "Discarding outcome of a stale job");
                return Ok(None);
            }
        }
        self.stage = Stage::Idle;

        match outcome.result {
            Ok(result) => {
                let processed = process(&result, self.settings.plain_text);
                Ok(Some(self.sink.publish(processed)))
            }
            Err(DispatchError::Cancelled) => Ok(None),
            Err(e) => {
                tracing::error!(id = outcome.id, "Recognition failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Run a job inline and complete it
    pub fn run_blocking(
        &mut self,
        job: RecognitionJob,
        dispatcher: &Dispatcher,
        observer: &mut dyn StageObserver,
    ) -> Result<Option<&ProcessedResult>, PipelineError> {
        let outcome = job.run(dispatcher, observer);
        self.complete(outcome)
    }

    pub fn recopy(&mut self) -> bool {
        self.sink.recopy()
    }

    pub fn last_result(&self) -> Option<&ProcessedResult> {
        self.sink.latest()
    }
}
