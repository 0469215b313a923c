//! Geometric primitives for page rasters.
//!
//! Coordinates are integer pixels with the origin at the top-left corner of the
//! page image and Y growing downward.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: u32,
    /// Y coordinate of top-left corner
    pub y: u32,
    /// Width of rectangle
    pub width: u32,
    /// Height of rectangle
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::Rect;
    ///
    /// let rect = Rect::new(10, 20, 100, 50);
    /// assert_eq!(rect.right(), 110);
    /// assert_eq!(rect.bottom(), 70);
    /// ```
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from inclusive corner pixels.
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        Self::new(left, top, right - left + 1, bottom - top + 1)
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> i64 {
        self.x as i64
    }

    /// Get the right edge x-coordinate (exclusive).
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> i64 {
        self.y as i64
    }

    /// Get the bottom edge y-coordinate (exclusive).
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Clamp the rectangle to a `width x height` raster.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the raster.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Rect::new(self.x, self.y, w, h))
    }
}

/// A detected text region: a bounding rectangle plus the area reported by the detector.
///
/// The area is carried separately because detectors may report the area of
/// the underlying contour rather than of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Bounding rectangle
    pub rect: Rect,
    /// Area reported by the detector
    pub area: u64,
}

impl Region {
    /// Create a region whose area is the area of its rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            area: rect.area(),
        }
    }

    /// Create a region with an explicit area.
    pub fn with_area(rect: Rect, area: u64) -> Self {
        Self { rect, area }
    }
}
