//! Block ordering and geometric features.
//!
//! Regions are ordered by ascending area, smallest first. Area is a proxy for
//! reading sequence that only holds for thin, fragmented line crops; the
//! vertical gaps and margins computed here are relative to that order, so
//! the classifier depends on it as-is.

use crate::geometry::{Rect, Region};

/// Page raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A region placed in reading order together with its relational features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRegion {
    /// Bounding rectangle
    pub rect: Rect,
    /// Detector-reported area
    pub area: u64,
    /// Distance from the page's left edge
    pub left_offset: i64,
    /// Distance to the page's right edge
    pub right_offset: i64,
    /// Distance from the previous region's bottom (page top for the first)
    pub gap_before: i64,
    /// Distance to the next region's top (page bottom for the last)
    pub gap_after: i64,
}

/// Order a page's regions and derive their geometric features.
///
/// Sorting is stable, so regions of equal area keep the detector's order.
///
/// # Examples
///
/// ```
/// use layout_oxide::geometry::{Rect, Region};
/// use layout_oxide::layout::reading_order::{order_regions, PageSize};
///
/// let regions = vec![
///     Region::from_rect(Rect::new(100, 300, 400, 30)),
///     Region::from_rect(Rect::new(150, 100, 200, 30)),
/// ];
/// let placed = order_regions(&regions, PageSize::new(600, 800));
/// assert_eq!(placed[0].rect.y, 100); // smaller area first
/// assert_eq!(placed[0].gap_before, 100);
/// assert_eq!(placed[1].gap_before, 300 - 130);
/// assert_eq!(placed[1].gap_after, 800 - 330);
/// ```
pub fn order_regions(regions: &[Region], page: PageSize) -> Vec<PlacedRegion> {
    let mut sorted: Vec<Region> = regions.to_vec();
    sorted.sort_by_key(|r| r.area);

    let count = sorted.len();
    sorted
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let rect = region.rect;
            let gap_before = if i > 0 {
                rect.top() - sorted[i - 1].rect.bottom()
            } else {
                rect.top()
            };
            let gap_after = if i + 1 < count {
                sorted[i + 1].rect.top() - rect.bottom()
            } else {
                page.height as i64 - rect.bottom()
            };

            PlacedRegion {
                rect,
                area: region.area,
                left_offset: rect.left(),
                right_offset: page.width as i64 - rect.right(),
                gap_before,
                gap_after,
            }
        })
        .collect()
}
