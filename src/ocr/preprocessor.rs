//! Raster preprocessing for region crops and whole pages.
//!
//! Crops are averaged for the emphasis signal and binarized (grayscale,
//! gaussian denoise, Otsu threshold) before they are handed to the OCR engine.

use image::{imageops, GrayImage, Luma, RgbImage};

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::ColorSample;

/// Crop `rect` out of a page, clamped to the page bounds.
///
/// Returns `None` when the rectangle lies entirely outside the page.
pub fn crop_region(page: &RgbImage, rect: Rect) -> Option<RgbImage> {
    let clamped = rect.clamp_to(page.width(), page.height())?;
    Some(imageops::crop_imm(page, clamped.x, clamped.y, clamped.width, clamped.height).to_image())
}

/// Mean value of each channel over a crop, truncated to integers.
///
/// An empty crop averages to white.
pub fn average_color(crop: &RgbImage) -> ColorSample {
    let count = crop.width() as u64 * crop.height() as u64;
    if count == 0 {
        return ColorSample::white();
    }

    let mut sums = [0u64; 3];
    for pixel in crop.pixels() {
        for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += channel as u64;
        }
    }

    ColorSample::new(
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    )
}

/// Otsu's threshold over a grayscale histogram.
///
/// Returns the threshold maximizing between-class variance. Pixels strictly
/// above it are foreground. A uniform or empty image yields 0.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0f64;
    let mut weight_background = 0u64;
    let mut best_variance = 0.0f64;
    let mut best_threshold = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += level as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}

/// Prepare a crop for OCR: grayscale, gaussian blur with `sigma`, then a
/// binary Otsu threshold (foreground 255, background 0).
pub fn binarize_for_ocr(crop: &RgbImage, sigma: f32) -> GrayImage {
    let gray = imageops::grayscale(crop);
    let blurred = imageops::blur(&gray, sigma);
    let threshold = otsu_threshold(&blurred);

    let mut binary = blurred;
    for pixel in binary.pixels_mut() {
        *pixel = if pixel.0[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        };
    }
    binary
}

/// Kernel size for a blur of `percent` of the shorter side: at least 1, always odd.
pub fn blur_kernel_size(width: u32, height: u32, percent: f32) -> u32 {
    let side = width.min(height) as f32;
    let size = ((percent / 100.0) * side) as u32;
    let size = size.max(1);
    if size % 2 == 0 {
        size + 1
    } else {
        size
    }
}

/// Gaussian blur whose kernel covers `percent` of the page's shorter side.
///
/// A 1-pixel kernel leaves the page unchanged. Fails with
/// [`Error::ValueOutOfRange`] when `percent` lies outside `0..=100`.
///
/// # Examples
///
/// ```
/// use image::RgbImage;
/// use layout_oxide::ocr::blur_by_percentage;
///
/// let page = RgbImage::new(200, 100);
/// assert!(blur_by_percentage(&page, 5.0).is_ok());
/// assert!(blur_by_percentage(&page, 120.0).is_err());
/// ```
pub fn blur_by_percentage(page: &RgbImage, percent: f32) -> Result<RgbImage> {
    if percent.is_nan() || !(0.0..=100.0).contains(&percent) {
        return Err(Error::ValueOutOfRange {
            name: "blur_percent",
            value: percent as f64,
            min: 0.0,
            max: 100.0,
        });
    }

    let kernel = blur_kernel_size(page.width(), page.height(), percent);
    if kernel <= 1 {
        return Ok(page.clone());
    }

    // Sigma a gaussian of this kernel size gets when none is given explicitly.
    let sigma = 0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    log::debug!(
        "Blurring {}x{} page with kernel {} (sigma {:.2})",
        page.width(),
        page.height(),
        kernel,
        sigma
    );
    Ok(imageops::blur(page, sigma))
}
