use std::env;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::debug::DebugConfig;
use self::hotkey::HotkeyConfig;
use self::math::MathConfig;
use self::ocr::OcrConfig;

pub mod capture;
pub mod debug;
pub mod hotkey;
pub mod math;
pub mod ocr;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
    pub math: MathConfig,
    pub debug: DebugConfig,
    pub hotkey: HotkeyConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment wins over whatever a profile file said
    pub fn apply_env(&mut self) {
        if let Ok(cmd) = env::var("TESSERACT_CMD") {
            self.ocr.tesseract_cmd = cmd;
        }

        if let Ok(cmd) = env::var("LATEX_OCR_CMD") {
            self.math.command = cmd;
        }

        if let Some(enabled) = env::var("SNIP_DEBUG").ok().and_then(|v| parse_flag(&v)) {
            self.debug.enabled = enabled;
        }

        if let Ok(dir) = env::var("SNIP_DEBUG_DIR") {
            self.debug.dir = dir.into();
        }

        if let Some(delay) = env::var("SNIP_HIDE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.capture.hide_delay_ms = delay;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
