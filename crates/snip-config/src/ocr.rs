use serde::{Deserialize, Serialize};
use snip_types::LanguageSet;

fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}

fn default_languages() -> Vec<String> {
    ["eng", "fra", "ara", "eng+fra", "eng+ara", "fra+ara", "eng+fra+ara"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract executable, either on PATH or absolute
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,
    /// Language set used for text captures
    #[serde(default)]
    pub language: LanguageSet,
    /// Choices offered by the language picker
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: default_tesseract_cmd(),
            language: LanguageSet::default(),
            languages: default_languages(),
        }
    }
}
