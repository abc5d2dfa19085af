use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use image::DynamicImage;
use snip_types::{BackendStatus, LanguageSet, Mode, RecognitionResult};

use crate::error::DispatchError;

/// Image-to-markup model
pub trait MarkupRecognizer: Send + Sync {
    fn name(&self) -> &str;

    fn recognize(&self, image: &DynamicImage) -> anyhow::Result<String>;
}

/// General OCR engine
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the engine can actually be called (binary installed, data present, ...)
    fn is_available(&self) -> bool;

    fn recognize(&self, image: &DynamicImage, languages: &LanguageSet) -> anyhow::Result<String>;
}

/// Routes a prepared image to the engine for its mode.
///
/// Engine errors and panics never escape: both come back as
/// [`DispatchError::RecognitionFailed`].
#[derive(Clone, Default)]
pub struct Dispatcher {
    markup: Option<Arc<dyn MarkupRecognizer>>,
    text: Option<Arc<dyn TextRecognizer>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(mut self, recognizer: Arc<dyn MarkupRecognizer>) -> Self {
        self.markup = Some(recognizer);
        self
    }

    pub fn with_text(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.text = Some(recognizer);
        self
    }

    pub fn availability(&self) -> BackendStatus {
        BackendStatus {
            math: self.markup.is_some(),
            text: self.text.as_ref().is_some_and(|t| t.is_available()),
        }
    }

    pub fn ensure_available(&self, mode: Mode) -> Result<(), DispatchError> {
        if self.availability().supports(mode) {
            Ok(())
        } else {
            Err(DispatchError::Unavailable { mode })
        }
    }

    pub fn dispatch(
        &self,
        image: &DynamicImage,
        mode: Mode,
        languages: &LanguageSet,
    ) -> Result<RecognitionResult, DispatchError> {
        self.ensure_available(mode)?;

        match mode {
            Mode::Math => {
                let Some(engine) = self.markup.as_ref() else {
                    return Err(DispatchError::Unavailable { mode });
                };
                tracing::debug!(engine = engine.name(), "Running markup recognition");
                guarded(|| engine.recognize(image)).map(RecognitionResult::Math)
            }
            Mode::Text => {
                let Some(engine) = self.text.as_ref() else {
                    return Err(DispatchError::Unavailable { mode });
                };
                tracing::debug!(engine = engine.name(), %languages, "Running text recognition");
                guarded(|| engine.recognize(image, languages)).map(|text| RecognitionResult::Text {
                    text,
                    languages: languages.clone(),
                })
            }
        }
    }
}

fn guarded(call: impl FnOnce() -> anyhow::Result<String>) -> Result<String, DispatchError> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => {
            tracing::error!("Recognition engine failed: {e:#}");
            Err(DispatchError::RecognitionFailed(format!("{e:#}")))
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "engine panicked".to_string());
            tracing::error!("Recognition engine panicked: {message}");
            Err(DispatchError::RecognitionFailed(message))
        }
    }
}
