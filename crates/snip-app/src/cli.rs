use clap::Parser;
use snip_config::Config;
use snip_core::session::Settings;
use snip_types::{LanguageSet, Mode};

#[derive(Parser, Debug)]
#[command(
    name = "snip",
    version,
    about = "Drag-select a screen region and get LaTeX or plain text from it"
)]
pub struct Cli {
    /// Profile to load from the config directory
    #[arg(long, default_value = "main")]
    pub profile: String,

    /// Initial recognition mode (math or text)
    #[arg(long)]
    pub mode: Option<Mode>,

    /// OCR languages, e.g. eng+fra
    #[arg(long)]
    pub lang: Option<LanguageSet>,

    /// Save every preprocessing stage as a PNG
    #[arg(long)]
    pub debug: bool,

    /// Show only the LaTeX, without the plain-text rendering
    #[arg(long)]
    pub no_plain_text: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Create a profile copied from main, then exit
    #[arg(long, value_name = "NAME")]
    pub new_profile: Option<String>,
}

impl Cli {
    /// Command-line flags win over the profile
    pub fn apply(&self, config: &mut Config) {
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if self.debug {
            config.debug.enabled = true;
        }
        if self.no_plain_text {
            config.math.plain_text = false;
        }
    }

    pub fn settings(&self, config: &Config) -> Settings {
        Settings {
            mode: self.mode.unwrap_or_default(),
            languages: config.ocr.language.clone(),
            plain_text: config.math.plain_text,
            debug: config.debug.enabled,
        }
    }
}
