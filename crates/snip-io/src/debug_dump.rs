use std::path::PathBuf;

use image::DynamicImage;
use snip_core::preprocess::StageObserver;

/// Writes each preprocessing stage to `<dir>/<stage>.png`, overwriting previous runs
pub struct DebugDumpObserver {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DebugDumpObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create debug dir {}: {e}", dir.display());
        }
        Self {
            dir,
            written: Vec::new(),
        }
    }

    /// Files saved so far, in stage order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl StageObserver for DebugDumpObserver {
    fn observe(&mut self, stage: &str, image: &DynamicImage) {
        let path = self.dir.join(format!("{stage}.png"));
        match image.save(&path) {
            Ok(()) => {
                tracing::debug!("Saved {}", path.display());
                self.written.push(path);
            }
            Err(e) => tracing::warn!("Failed to save {}: {e}", path.display()),
        }
    }
}
