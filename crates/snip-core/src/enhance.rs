//! Grayscale enhancement primitives used by the preprocessing profiles.
//!
//! The formulas follow the classic imaging-library definitions so that tuned
//! factors (contrast 3.0, sharpness 2.5, ...) keep their meaning: every
//! enhancement is a linear blend between the image and a "degenerate" version
//! of it, `out = degenerate + factor * (image - degenerate)`.

use image::{GrayImage, Luma, RgbImage};

/// ITU-R 601-2 luma, rounded
pub fn grayscale(rgb: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (dst, src) in gray.pixels_mut().zip(rgb.pixels()) {
        let [r, g, b] = src.0;
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        *dst = Luma([luma as u8]);
    }
    gray
}

/// Stretch the histogram so the darkest remaining value maps to 0 and the
/// brightest to 255, after discarding `cutoff` percent of pixels from each end.
pub fn autocontrast(gray: &GrayImage, cutoff: f32) -> GrayImage {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    let cut = (total as f64 * cutoff as f64 / 100.0) as u64;
    trim(histogram.iter_mut(), cut);
    trim(histogram.iter_mut().rev(), cut);

    let lo = histogram.iter().position(|&count| count > 0);
    let hi = histogram.iter().rposition(|&count| count > 0);
    let (lo, hi) = match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => (lo as f64, hi as f64),
        _ => return gray.clone(),
    };

    let lut: [u8; 256] = std::array::from_fn(|value| {
        ((value as f64 - lo) * 255.0 / (hi - lo)).clamp(0.0, 255.0) as u8
    });

    map_pixels(gray, |value| lut[value as usize])
}

fn trim<'a>(bins: impl Iterator<Item = &'a mut u64>, mut cut: u64) {
    for count in bins {
        if cut == 0 {
            break;
        }
        let removed = cut.min(*count);
        *count -= removed;
        cut -= removed;
    }
}

/// Blend against a flat image of the mean luminance
pub fn contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let count = (gray.width() as u64 * gray.height() as u64).max(1);
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    let mean = (sum as f64 / count as f64 + 0.5).floor() as f32;

    map_pixels(gray, |value| blend(mean, value as f32, factor))
}

/// Blend against a 3x3 smoothed copy
pub fn sharpness(gray: &GrayImage, factor: f32) -> GrayImage {
    let smoothed = smooth(gray);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for ((dst, src), soft) in out.pixels_mut().zip(gray.pixels()).zip(smoothed.pixels()) {
        *dst = Luma([blend(soft.0[0] as f32, src.0[0] as f32, factor)]);
    }
    out
}

/// Kernel `[1 1 1; 1 5 1; 1 1 1] / 13`, border pixels left untouched
fn smooth(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = gray.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0u32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let weight = if kx == 1 && ky == 1 { 5 } else { 1 };
                    acc += weight * gray.get_pixel(x + kx - 1, y + ky - 1).0[0] as u32;
                }
            }
            out.put_pixel(x, y, Luma([((acc as f32 / 13.0) + 0.5) as u8]));
        }
    }
    out
}

fn blend(degenerate: f32, value: f32, factor: f32) -> u8 {
    (degenerate + factor * (value - degenerate)).clamp(0.0, 255.0) as u8
}

fn map_pixels(gray: &GrayImage, f: impl Fn(u8) -> u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = f(pixel.0[0]);
    }
    out
}
