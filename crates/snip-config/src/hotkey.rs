use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Start a capture with Ctrl+Shift+S from anywhere
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}
