use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, Rgba, RgbaImage};
use snip_core::capture::{ScreenCapturer, Snapshot};
use snip_core::dispatch::{Dispatcher, MarkupRecognizer, TextRecognizer};
use snip_core::error::{CaptureError, DispatchError, PipelineError};
use snip_core::overlay::PointerEvent;
use snip_core::preprocess::{NoopObserver, StageObserver};
use snip_core::session::{Phase, Pipeline, SelectionStep, Settings};
use snip_core::sink::{ClipboardSink, DisplaySurface, ResultSink};
use snip_types::{LanguageSet, Mode, Point};

/// Light screen with a dark block where the "equation" is
struct StaticScreen;

impl ScreenCapturer for StaticScreen {
    fn capture_full_display(&self) -> Result<Snapshot, CaptureError> {
        Ok(Snapshot::new(RgbaImage::from_fn(640, 360, |x, y| {
            if (100..200).contains(&x) && (50..90).contains(&y) {
                Rgba([10, 10, 10, 255])
            } else {
                Rgba([245, 245, 245, 255])
            }
        })))
    }
}

/// Records the size of every image it is given
struct ScriptedMarkup {
    output: &'static str,
    seen: Mutex<Vec<(u32, u32)>>,
}

impl MarkupRecognizer for ScriptedMarkup {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(&self, image: &DynamicImage) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push((image.width(), image.height()));
        Ok(self.output.to_string())
    }
}

struct ScriptedText;

impl TextRecognizer for ScriptedText {
    fn name(&self) -> &str {
        "scripted-ocr"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, image: &DynamicImage, _languages: &LanguageSet) -> anyhow::Result<String> {
        assert!(image.as_luma8().is_some(), "text profile hands over grayscale");
        Ok("  Bonjour\n".to_string())
    }
}

struct FailingMarkup;

impl MarkupRecognizer for FailingMarkup {
    fn name(&self) -> &str {
        "failing"
    }

    fn recognize(&self, _image: &DynamicImage) -> anyhow::Result<String> {
        anyhow::bail!("out of memory")
    }
}

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl ClipboardSink for Log {
    fn copy(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

impl DisplaySurface for Log {
    fn show(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

#[derive(Default)]
struct StageNames(Vec<String>);

impl StageObserver for StageNames {
    fn observe(&mut self, stage: &str, _image: &DynamicImage) {
        self.0.push(stage.to_string());
    }
}

fn drag(pipeline: &mut Pipeline, from: (i32, i32), to: (i32, i32)) -> SelectionStep {
    pipeline.handle_pointer(PointerEvent::Down(Point::new(from.0, from.1)));
    pipeline.handle_pointer(PointerEvent::Move(Point::new(to.0, to.1)));
    pipeline.handle_pointer(PointerEvent::Up(Point::new(to.0, to.1)))
}

#[test]
fn math_capture_end_to_end() {
    let clipboard = Log::default();
    let display = Log::default();
    let mut pipeline = Pipeline::new(
        Settings::default(),
        ResultSink::new(Box::new(clipboard.clone()), Box::new(display.clone())),
    );

    let markup = Arc::new(ScriptedMarkup {
        output: "x^{2}+1",
        seen: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::new().with_markup(markup.clone());
    pipeline.mark_ready(dispatcher.availability());

    pipeline.begin_capture(&StaticScreen).unwrap();
    let SelectionStep::Recognize(job) = drag(&mut pipeline, (90, 40), (210, 100)) else {
        panic!("selection should produce a job");
    };

    let mut stages = StageNames::default();
    let result = pipeline
        .run_blocking(job, &dispatcher, &mut stages)
        .unwrap()
        .cloned()
        .unwrap();

    assert!(result.display_text.contains("x^{2}+1"));
    assert!(result.display_text.contains("x^(2)+1"));
    assert_eq!(result.clipboard_payload, "x^{2}+1");
    assert_eq!(clipboard.entries(), ["x^{2}+1"]);
    assert_eq!(display.entries(), [result.display_text.clone()]);

    // 120x60 crop upscaled to 400x200, then padded
    assert_eq!(*markup.seen.lock().unwrap(), [(440, 240)]);
    assert_eq!(
        stages.0,
        ["debug_1_original", "debug_2_enhanced", "debug_3_resized", "debug_4_final"]
    );

    assert!(pipeline.view().can_start());
    assert!(pipeline.recopy());
    assert_eq!(clipboard.entries().len(), 2);
}

#[test]
fn text_capture_uses_selected_languages() {
    let clipboard = Log::default();
    let mut pipeline = Pipeline::new(
        Settings {
            mode: Mode::Text,
            languages: "eng+fra".parse().unwrap(),
            plain_text: true,
            debug: false,
        },
        ResultSink::new(Box::new(clipboard.clone()), Box::new(Log::default())),
    );
    let dispatcher = Dispatcher::new()
        .with_markup(Arc::new(FailingMarkup))
        .with_text(Arc::new(ScriptedText));
    pipeline.mark_ready(dispatcher.availability());

    let session = pipeline.begin_capture(&StaticScreen).unwrap();
    assert_eq!(session.hint(), "Select text to recognize (ESC to cancel)");

    let SelectionStep::Recognize(job) = drag(&mut pipeline, (0, 0), (300, 200)) else {
        panic!("selection should produce a job");
    };
    let result = pipeline
        .run_blocking(job, &dispatcher, &mut NoopObserver)
        .unwrap()
        .cloned()
        .unwrap();

    assert_eq!(result.display_text, "Text (eng+fra):\nBonjour");
    assert_eq!(clipboard.entries(), ["Bonjour"]);
}

#[test]
fn engine_failure_keeps_previous_result() {
    let clipboard = Log::default();
    let mut pipeline = Pipeline::new(
        Settings::default(),
        ResultSink::new(Box::new(clipboard.clone()), Box::new(Log::default())),
    );
    let good = Dispatcher::new().with_markup(Arc::new(ScriptedMarkup {
        output: "a",
        seen: Mutex::new(Vec::new()),
    }));
    let bad = Dispatcher::new().with_markup(Arc::new(FailingMarkup));
    pipeline.mark_ready(good.availability());

    pipeline.begin_capture(&StaticScreen).unwrap();
    let SelectionStep::Recognize(job) = drag(&mut pipeline, (0, 0), (50, 50)) else {
        panic!("selection should produce a job");
    };
    pipeline.run_blocking(job, &good, &mut NoopObserver).unwrap();

    pipeline.begin_capture(&StaticScreen).unwrap();
    let SelectionStep::Recognize(job) = drag(&mut pipeline, (0, 0), (50, 50)) else {
        panic!("selection should produce a job");
    };
    let err = pipeline
        .run_blocking(job, &bad, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Dispatch(DispatchError::RecognitionFailed(ref message)) if message == "out of memory"
    ));

    assert_eq!(pipeline.view().phase, Phase::Idle);
    assert_eq!(
        pipeline.last_result().map(|r| r.clipboard_payload.as_str()),
        Some("a")
    );
    assert_eq!(clipboard.entries(), ["a"]);
}

#[test]
fn cancelled_selection_never_reaches_engine() {
    let markup = Arc::new(ScriptedMarkup {
        output: "unused",
        seen: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::new().with_markup(markup.clone());
    let mut pipeline = Pipeline::new(
        Settings::default(),
        ResultSink::new(Box::new(Log::default()), Box::new(Log::default())),
    );
    pipeline.mark_ready(dispatcher.availability());

    pipeline.begin_capture(&StaticScreen).unwrap();
    assert!(matches!(
        drag(&mut pipeline, (100, 100), (105, 300)),
        SelectionStep::Cancelled
    ));

    pipeline.begin_capture(&StaticScreen).unwrap();
    pipeline.handle_pointer(PointerEvent::Down(Point::new(0, 0)));
    assert!(matches!(
        pipeline.handle_pointer(PointerEvent::Cancel),
        SelectionStep::Cancelled
    ));

    assert!(markup.seen.lock().unwrap().is_empty());
    assert!(!pipeline.recopy());
}
