use image::{RgbaImage, imageops};
use snip_types::Region;

use crate::error::CaptureError;

/// One full-display grab, taken once per capture session
#[derive(Debug, Clone)]
pub struct Snapshot {
    image: RgbaImage,
}

impl Snapshot {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Wrap a raw RGBA buffer, `None` when the length does not match the dimensions
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy out the selected region, clamped to the snapshot bounds.
    ///
    /// Returns `None` if nothing of the region lies on the snapshot.
    pub fn crop(&self, region: &Region) -> Option<RgbaImage> {
        let (w, h) = (self.width() as i64, self.height() as i64);

        let x1 = (region.x1() as i64).clamp(0, w);
        let y1 = (region.y1() as i64).clamp(0, h);
        let x2 = (region.x2() as i64).clamp(0, w);
        let y2 = (region.y2() as i64).clamp(0, h);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(
            imageops::crop_imm(
                &self.image,
                x1 as u32,
                y1 as u32,
                (x2 - x1) as u32,
                (y2 - y1) as u32,
            )
            .to_image(),
        )
    }
}

/// Source of full-display snapshots
pub trait ScreenCapturer {
    fn capture_full_display(&self) -> Result<Snapshot, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use snip_types::Point;

    fn gradient(width: u32, height: u32) -> Snapshot {
        Snapshot::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    #[test]
    fn test_crop_matches_source_pixels() {
        let snapshot = gradient(100, 80);
        let region = Region::normalize(Point::new(60, 50), Point::new(20, 10)).unwrap();

        let crop = snapshot.crop(&region).unwrap();
        assert_eq!(crop.dimensions(), (40, 40));
        assert_eq!(crop.get_pixel(0, 0), &Rgba([20, 10, 0, 255]));
        assert_eq!(crop.get_pixel(39, 39), &Rgba([59, 49, 0, 255]));
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let snapshot = gradient(100, 80);
        let region = Region::normalize(Point::new(-20, -20), Point::new(50, 200)).unwrap();

        let crop = snapshot.crop(&region).unwrap();
        assert_eq!(crop.dimensions(), (50, 80));
    }

    #[test]
    fn test_crop_outside_snapshot() {
        let snapshot = gradient(100, 80);
        let region = Region::normalize(Point::new(200, 200), Point::new(300, 300)).unwrap();
        assert!(snapshot.crop(&region).is_none());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Snapshot::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(Snapshot::from_raw(2, 2, vec![0; 15]).is_none());
    }
}
