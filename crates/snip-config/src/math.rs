use serde::{Deserialize, Serialize};

fn default_command() -> String {
    "pix2tex".to_string()
}

fn default_plain_text() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MathConfig {
    /// Image-to-LaTeX executable, invoked as `<command> [args...] <image.png>`
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Also show a plain-text transliteration of the markup
    #[serde(default = "default_plain_text")]
    pub plain_text: bool,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            plain_text: default_plain_text(),
        }
    }
}
