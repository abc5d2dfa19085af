use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{DynamicImage, ImageFormat};
use uuid::Uuid;

/// PNG handed to an external engine, removed on drop
pub struct TempPng {
    path: PathBuf,
}

impl TempPng {
    pub fn write(image: &DynamicImage) -> anyhow::Result<Self> {
        let file = Self {
            path: std::env::temp_dir().join(format!("snip_{}.png", Uuid::new_v4())),
        };
        image
            .save_with_format(&file.path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPng {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!("Failed to cleanup temp file {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn test_temp_png_cleanup() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(4, 3));
        let path = {
            let temp = TempPng::write(&image).unwrap();
            assert!(temp.path().exists());
            let reloaded = image::open(temp.path()).unwrap();
            assert_eq!((reloaded.width(), reloaded.height()), (4, 3));
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_png_names_unique() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(1, 1));
        let a = TempPng::write(&image).unwrap();
        let b = TempPng::write(&image).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
