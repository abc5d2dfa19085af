use snip_types::ProcessedResult;

/// Somewhere to put the copyable payload. Failures are logged by the implementation, never raised.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str);
}

/// Where the display text is shown
pub trait DisplaySurface {
    fn show(&mut self, text: &str);
}

/// Publishes processed results and remembers the latest one for re-copying
pub struct ResultSink {
    clipboard: Box<dyn ClipboardSink>,
    display: Box<dyn DisplaySurface>,
    latest: Option<ProcessedResult>,
}

impl ResultSink {
    pub fn new(clipboard: Box<dyn ClipboardSink>, display: Box<dyn DisplaySurface>) -> Self {
        Self {
            clipboard,
            display,
            latest: None,
        }
    }

    /// Show the display text, copy the payload, then replace the remembered result
    pub fn publish(&mut self, result: ProcessedResult) -> &ProcessedResult {
        self.display.show(&result.display_text);
        self.clipboard.copy(&result.clipboard_payload);
        tracing::info!(kind = %result.kind, chars = result.clipboard_payload.chars().count(), "Result published");
        self.latest.insert(result)
    }

    /// Copy the latest payload again. Returns `false` when there is nothing to copy.
    pub fn recopy(&mut self) -> bool {
        match &self.latest {
            Some(result) => {
                self.clipboard.copy(&result.clipboard_payload);
                true
            }
            None => false,
        }
    }

    pub fn latest(&self) -> Option<&ProcessedResult> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_types::Mode;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl ClipboardSink for Recorder {
        fn copy(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    impl DisplaySurface for Recorder {
        fn show(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    fn result(payload: &str) -> ProcessedResult {
        ProcessedResult {
            display_text: format!("LaTeX: {payload}"),
            clipboard_payload: payload.to_string(),
            kind: Mode::Math,
        }
    }

    #[test]
    fn test_publish_shows_and_copies() {
        let clipboard = Recorder::default();
        let display = Recorder::default();
        let mut sink = ResultSink::new(Box::new(clipboard.clone()), Box::new(display.clone()));

        sink.publish(result("a+b"));
        assert_eq!(*clipboard.0.borrow(), ["a+b"]);
        assert_eq!(*display.0.borrow(), ["LaTeX: a+b"]);
        assert_eq!(sink.latest(), Some(&result("a+b")));
    }

    #[test]
    fn test_recopy_uses_latest() {
        let clipboard = Recorder::default();
        let mut sink = ResultSink::new(Box::new(clipboard.clone()), Box::new(Recorder::default()));

        assert!(!sink.recopy());
        assert!(clipboard.0.borrow().is_empty());

        sink.publish(result("first"));
        sink.publish(result("second"));
        assert!(sink.recopy());
        assert_eq!(*clipboard.0.borrow(), ["first", "second", "second"]);
    }
}
