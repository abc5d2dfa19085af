use serde::{Deserialize, Serialize};

fn default_overlay_dim() -> f32 {
    0.3
}

fn default_hide_delay_ms() -> u64 {
    200
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Brightness factor applied to the overlay backdrop
    #[serde(default = "default_overlay_dim")]
    pub overlay_dim: f32,
    /// Time given to the control window to disappear before grabbing the screen
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            overlay_dim: default_overlay_dim(),
            hide_delay_ms: default_hide_delay_ms(),
        }
    }
}
