//! Text region detection on page rasters.
//!
//! Regions arrive pre-marked: an upstream line marker outlines every text line
//! on the page image with a pure green rectangle. [`MarkedRegionDetector`]
//! recovers those rectangles from the green pixels.

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::geometry::{Rect, Region};

/// Finds the text regions of a page.
pub trait RegionDetector: Send + Sync {
    /// Detect the regions of `page`, in any order.
    fn detect(&self, page: &RgbImage) -> Result<Vec<Region>>;
}

/// Hue range of marker pixels, in half-degrees (0..180).
const MARKER_HUE: (u16, u16) = (40, 80);
/// Minimum saturation of marker pixels (0..255).
const MARKER_MIN_SATURATION: u8 = 40;
/// Minimum value of marker pixels (0..255).
const MARKER_MIN_VALUE: u8 = 40;

/// Convert an RGB pixel to `(hue / 2, saturation, value)`, all 8-bit.
pub fn to_hsv(pixel: &Rgb<u8>) -> (u16, u8, u8) {
    let [r, g, b] = pixel.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    if max == 0 {
        return (0, 0, 0);
    }
    let saturation = (delta * 255.0 / max as f32).round() as u8;
    if delta == 0.0 {
        return (0, saturation, max);
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut hue = if max as f32 == r {
        60.0 * (g - b) / delta
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    (((hue / 2.0).round() as u16) % 180, saturation, max)
}

/// Whether a pixel belongs to a marker outline.
pub fn is_marker_pixel(pixel: &Rgb<u8>) -> bool {
    let (hue, saturation, value) = to_hsv(pixel);
    hue >= MARKER_HUE.0
        && hue <= MARKER_HUE.1
        && saturation >= MARKER_MIN_SATURATION
        && value >= MARKER_MIN_VALUE
}

/// Detects green marker rectangles.
///
/// Each 8-connected group of marker pixels becomes one region whose area is
/// the area of its bounding box. Groups narrower or shorter than `min_side`
/// pixels are dropped as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedRegionDetector {
    min_side: u32,
}

impl Default for MarkedRegionDetector {
    fn default() -> Self {
        Self::new(2)
    }
}

impl MarkedRegionDetector {
    /// Create a detector ignoring groups smaller than `min_side` on either axis.
    pub fn new(min_side: u32) -> Self {
        Self { min_side }
    }

    fn components(&self, page: &RgbImage) -> Vec<Rect> {
        let (width, height) = page.dimensions();
        let (w, h) = (width as usize, height as usize);
        let mask: Vec<bool> = page.pixels().map(is_marker_pixel).collect();
        let mut visited = vec![false; w * h];
        let mut rects = Vec::new();

        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                if mask[idx] && !visited[idx] {
                    rects.push(flood_fill_bounds(&mask, &mut visited, w, h, x, y));
                }
            }
        }
        rects
    }
}

impl RegionDetector for MarkedRegionDetector {
    fn detect(&self, page: &RgbImage) -> Result<Vec<Region>> {
        let regions: Vec<Region> = self
            .components(page)
            .into_iter()
            .filter(|r| r.width >= self.min_side && r.height >= self.min_side)
            .map(Region::from_rect)
            .collect();
        log::debug!("Detected {} marked regions", regions.len());
        Ok(regions)
    }
}

/// Color of region outlines.
pub const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Copy of `page` with every region outlined one pixel wide in [`MARKER_COLOR`].
///
/// Outlines are clamped to the page. [`MarkedRegionDetector`] recovers the
/// clamped rectangles of non-touching regions from the result.
pub fn outline_regions(page: &RgbImage, regions: &[Region]) -> RgbImage {
    let mut marked = page.clone();
    for region in regions {
        let Some(rect) = region.rect.clamp_to(page.width(), page.height()) else {
            continue;
        };
        let (right, bottom) = (rect.x + rect.width - 1, rect.y + rect.height - 1);
        for x in rect.x..=right {
            marked.put_pixel(x, rect.y, MARKER_COLOR);
            marked.put_pixel(x, bottom, MARKER_COLOR);
        }
        for y in rect.y..=bottom {
            marked.put_pixel(rect.x, y, MARKER_COLOR);
            marked.put_pixel(right, y, MARKER_COLOR);
        }
    }
    marked
}

/// Bounding rectangle of the 8-connected component containing `(start_x, start_y)`.
fn flood_fill_bounds(
    mask: &[bool],
    visited: &mut [bool],
    width: usize,
    height: usize,
    start_x: usize,
    start_y: usize,
) -> Rect {
    let mut stack = vec![(start_x, start_y)];
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (start_x, start_y, start_x, start_y);

    while let Some((x, y)) = stack.pop() {
        let idx = y * width + x;
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let nidx = ny as usize * width + nx as usize;
                if mask[nidx] && !visited[nidx] {
                    stack.push((nx as usize, ny as usize));
                }
            }
        }
    }

    Rect::from_corners(min_x as u32, min_y as u32, max_x as u32, max_y as u32)
}
