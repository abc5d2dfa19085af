//! Per-mode image normalization applied between cropping and recognition.
//!
//! Both profiles are pure functions of the input image. Intermediate stages are
//! reported to a [`StageObserver`], which is how debug dumps are produced
//! without the transforms themselves touching the filesystem.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use snip_types::Mode;

use crate::enhance::{autocontrast, contrast, grayscale, sharpness};
use crate::error::PreprocessError;

pub const MATH_MIN_WIDTH: u32 = 400;
pub const MATH_MIN_HEIGHT: u32 = 200;
pub const MATH_PADDING: u32 = 20;

pub const TEXT_MIN_WIDTH: u32 = 300;
pub const TEXT_MIN_HEIGHT: u32 = 100;

/// Receives a copy of the image after named preprocessing stages
pub trait StageObserver {
    /// Skip building stage copies when nobody is listening
    fn enabled(&self) -> bool {
        true
    }

    fn observe(&mut self, stage: &str, image: &DynamicImage);
}

pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn enabled(&self) -> bool {
        false
    }

    fn observe(&mut self, _stage: &str, _image: &DynamicImage) {}
}

pub fn preprocess(
    mode: Mode,
    image: &DynamicImage,
    observer: &mut dyn StageObserver,
) -> Result<DynamicImage, PreprocessError> {
    match mode {
        Mode::Math => preprocess_for_math(image, observer),
        Mode::Text => preprocess_for_text(image, observer),
    }
}

/// Aggressive cleanup for rendered equations: high contrast, generous white margin
pub fn preprocess_for_math(
    image: &DynamicImage,
    observer: &mut dyn StageObserver,
) -> Result<DynamicImage, PreprocessError> {
    ensure_not_empty(image)?;

    let rgb = image.to_rgb8();
    emit(observer, "debug_1_original", || DynamicImage::ImageRgb8(rgb.clone()));

    let gray = enhance(&rgb, 2.0, 3.0, 2.5);
    let mut rgb = DynamicImage::ImageLuma8(gray).to_rgb8();
    emit(observer, "debug_2_enhanced", || DynamicImage::ImageRgb8(rgb.clone()));

    if let Some((width, height)) =
        upscaled_size(rgb.dimensions(), (MATH_MIN_WIDTH, MATH_MIN_HEIGHT), 1)
    {
        tracing::debug!(from = ?rgb.dimensions(), to = ?(width, height), "Upscaling math capture");
        rgb = imageops::resize(&rgb, width, height, FilterType::Lanczos3);
        emit(observer, "debug_3_resized", || DynamicImage::ImageRgb8(rgb.clone()));
    }

    let padded = pad(&rgb, MATH_PADDING);
    let padded = DynamicImage::ImageRgb8(padded);
    emit(observer, "debug_4_final", || padded.clone());

    Ok(padded)
}

/// Milder cleanup for OCR, where over-sharpened glyphs turn into noise
pub fn preprocess_for_text(
    image: &DynamicImage,
    observer: &mut dyn StageObserver,
) -> Result<DynamicImage, PreprocessError> {
    ensure_not_empty(image)?;

    let rgb = image.to_rgb8();
    emit(observer, "debug_text_1_original", || DynamicImage::ImageRgb8(rgb.clone()));

    let mut gray = enhance(&rgb, 1.0, 2.0, 1.5);

    // OCR gets twice the minimum as headroom
    if let Some((width, height)) =
        upscaled_size(gray.dimensions(), (TEXT_MIN_WIDTH, TEXT_MIN_HEIGHT), 2)
    {
        tracing::debug!(from = ?gray.dimensions(), to = ?(width, height), "Upscaling text capture");
        gray = imageops::resize(&gray, width, height, FilterType::Lanczos3);
    }

    let gray = DynamicImage::ImageLuma8(gray);
    emit(observer, "debug_text_2_final", || gray.clone());

    Ok(gray)
}

fn enhance(rgb: &RgbImage, cutoff: f32, contrast_factor: f32, sharpness_factor: f32) -> GrayImage {
    let gray = grayscale(rgb);
    let gray = autocontrast(&gray, cutoff);
    let gray = contrast(&gray, contrast_factor);
    sharpness(&gray, sharpness_factor)
}

/// Target size when an image is below either minimum, `None` otherwise.
///
/// Aspect ratio is preserved; the scale is the larger of the two ratios,
/// multiplied by `headroom`.
fn upscaled_size(
    (width, height): (u32, u32),
    (min_width, min_height): (u32, u32),
    headroom: u32,
) -> Option<(u32, u32)> {
    if width >= min_width && height >= min_height {
        return None;
    }

    let scale = (min_width as f64 / width as f64).max(min_height as f64 / height as f64)
        * headroom as f64;

    // scale >= both ratios, so flooring can only lose a float epsilon below the minimum
    let new_width = ((width as f64 * scale) as u32).max(min_width * headroom);
    let new_height = ((height as f64 * scale) as u32).max(min_height * headroom);
    Some((new_width, new_height))
}

fn pad(rgb: &RgbImage, padding: u32) -> RgbImage {
    let mut padded = RgbImage::from_pixel(
        rgb.width() + 2 * padding,
        rgb.height() + 2 * padding,
        Rgb([255, 255, 255]),
    );
    imageops::replace(&mut padded, rgb, padding as i64, padding as i64);
    padded
}

fn ensure_not_empty(image: &DynamicImage) -> Result<(), PreprocessError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PreprocessError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

fn emit(observer: &mut dyn StageObserver, stage: &str, image: impl FnOnce() -> DynamicImage) {
    if observer.enabled() {
        observer.observe(stage, &image());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    #[derive(Default)]
    struct Recorder {
        stages: Vec<(String, (u32, u32))>,
    }

    impl StageObserver for Recorder {
        fn observe(&mut self, stage: &str, image: &DynamicImage) {
            self.stages.push((stage.to_string(), (image.width(), image.height())));
        }
    }

    /// Dark glyph-ish bars on a light background
    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if (x / 3) % 2 == 0 && y % 5 != 0 {
                Rgba([40, 40, 40, 255])
            } else {
                Rgba([220, 220, 220, 255])
            }
        }))
    }

    #[test]
    fn test_math_small_input_meets_minimum_plus_padding() {
        for (w, h) in [(100, 50), (30, 30), (399, 199), (40, 300), (500, 100)] {
            let out = preprocess_for_math(&sample(w, h), &mut NoopObserver).unwrap();
            assert!(out.width() >= MATH_MIN_WIDTH + 2 * MATH_PADDING, "{w}x{h} -> {}", out.width());
            assert!(out.height() >= MATH_MIN_HEIGHT + 2 * MATH_PADDING, "{w}x{h} -> {}", out.height());
        }
    }

    #[test]
    fn test_math_scale_preserves_aspect() {
        let out = preprocess_for_math(&sample(100, 50), &mut NoopObserver).unwrap();
        assert_eq!((out.width(), out.height()), (440, 240));

        let out = preprocess_for_math(&sample(50, 50), &mut NoopObserver).unwrap();
        assert_eq!((out.width(), out.height()), (440, 440));
    }

    #[test]
    fn test_math_large_input_only_padded() {
        let out = preprocess_for_math(&sample(800, 400), &mut NoopObserver).unwrap();
        assert_eq!((out.width(), out.height()), (840, 440));
    }

    #[test]
    fn test_math_output_is_rgb_with_white_margin() {
        let out = preprocess_for_math(&sample(100, 50), &mut NoopObserver).unwrap();
        let rgb = out.as_rgb8().expect("math profile returns RGB");
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(439, 239), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(19, 120), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_text_small_input_doubles_scale() {
        let out = preprocess_for_text(&sample(100, 50), &mut NoopObserver).unwrap();
        assert_eq!((out.width(), out.height()), (600, 300));

        for (w, h) in [(20, 20), (299, 500), (1000, 99)] {
            let out = preprocess_for_text(&sample(w, h), &mut NoopObserver).unwrap();
            assert!(out.width() >= 2 * TEXT_MIN_WIDTH);
            assert!(out.height() >= 2 * TEXT_MIN_HEIGHT);
        }
    }

    #[test]
    fn test_text_large_input_unpadded_grayscale() {
        let out = preprocess_for_text(&sample(400, 120), &mut NoopObserver).unwrap();
        assert_eq!((out.width(), out.height()), (400, 120));
        assert!(out.as_luma8().is_some());
    }

    #[test]
    fn test_text_contrast_is_stretched() {
        let out = preprocess_for_text(&sample(400, 120), &mut NoopObserver).unwrap();
        let gray = out.as_luma8().unwrap();
        let min = gray.pixels().map(|p: &Luma<u8>| p.0[0]).min().unwrap();
        let max = gray.pixels().map(|p: &Luma<u8>| p.0[0]).max().unwrap();
        assert_eq!((min, max), (0, 255));
    }

    #[test]
    fn test_math_stages_reported_in_order() {
        let mut recorder = Recorder::default();
        preprocess_for_math(&sample(100, 50), &mut recorder).unwrap();
        let names: Vec<_> = recorder.stages.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            ["debug_1_original", "debug_2_enhanced", "debug_3_resized", "debug_4_final"]
        );
        assert_eq!(recorder.stages[0].1, (100, 50));
        assert_eq!(recorder.stages[3].1, (440, 240));
    }

    #[test]
    fn test_math_no_resize_stage_for_large_input() {
        let mut recorder = Recorder::default();
        preprocess_for_math(&sample(800, 400), &mut recorder).unwrap();
        assert!(recorder.stages.iter().all(|(n, _)| n != "debug_3_resized"));
        assert_eq!(recorder.stages.len(), 3);
    }

    #[test]
    fn test_observer_does_not_change_output() {
        let input = sample(120, 60);
        let quiet = preprocess_for_text(&input, &mut NoopObserver).unwrap();
        let mut recorder = Recorder::default();
        let observed = preprocess_for_text(&input, &mut recorder).unwrap();
        assert_eq!(quiet, observed);
        assert_eq!(recorder.stages.len(), 2);
    }

    #[test]
    fn test_empty_image_rejected() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        assert_eq!(
            preprocess(Mode::Math, &empty, &mut NoopObserver),
            Err(PreprocessError::EmptyImage {
                width: 0,
                height: 10
            })
        );
    }
}
