use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DebugConfig {
    /// Dump every preprocessing stage as a PNG
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_dir(),
        }
    }
}
