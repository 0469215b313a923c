//! Text line detection on unmarked page rasters.
//!
//! Tesseract's page layout analysis reports a box for every text line it
//! finds (level 4 of its TSV output). Each box is grown by a fixed margin and
//! becomes one region, the same rectangle a line marker would have outlined.

use image::{imageops, RgbImage};

use crate::error::{Error, Result};
use crate::geometry::{Rect, Region};
use crate::ocr::detector::RegionDetector;
use crate::ocr::engine::{encode_png, LayoutHint, TesseractCli};

/// TSV `level` of text line rows.
pub const LINE_LEVEL: u32 = 4;

/// Number of leading TSV columns up to and including `height`.
const TSV_GEOMETRY_COLUMNS: usize = 10;

/// Boxes of the text lines in Tesseract TSV output.
///
/// The header and rows of other levels are skipped, as are rows whose
/// geometry does not parse or that have no extent.
///
/// # Examples
///
/// ```
/// use layout_oxide::geometry::Rect;
/// use layout_oxide::ocr::parse_line_boxes;
///
/// let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
///            4\t1\t1\t1\t1\t0\t52\t40\t300\t18\t-1\t\n\
///            5\t1\t1\t1\t1\t1\t52\t40\t80\t18\t91.5\tСтатья\n";
/// assert_eq!(parse_line_boxes(tsv), vec![Rect::new(52, 40, 300, 18)]);
/// ```
pub fn parse_line_boxes(tsv: &str) -> Vec<Rect> {
    tsv.lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < TSV_GEOMETRY_COLUMNS {
                return None;
            }
            let level: u32 = columns[0].trim().parse().ok()?;
            if level != LINE_LEVEL {
                return None;
            }
            let mut geometry = columns[6..TSV_GEOMETRY_COLUMNS]
                .iter()
                .map(|c| c.trim().parse::<u32>().ok());
            let (left, top, width, height) = (
                geometry.next()??,
                geometry.next()??,
                geometry.next()??,
                geometry.next()??,
            );
            if width == 0 || height == 0 {
                return None;
            }
            Some(Rect::new(left, top, width, height))
        })
        .collect()
}

/// Grow a line box by `expansion` pixels on every side and clamp it to the page.
///
/// The left and top edges stop at 0. The result spans the outline a marker
/// draws from `(x - e, y - e)` to `(x - e + w + 2e, y - e + h + 2e)`, both
/// corners inclusive.
pub fn expand_line_box(
    rect: Rect,
    expansion: u32,
    page_width: u32,
    page_height: u32,
) -> Option<Rect> {
    let x = rect.x.saturating_sub(expansion);
    let y = rect.y.saturating_sub(expansion);
    let width = rect.width.saturating_add(expansion.saturating_mul(2));
    let height = rect.height.saturating_add(expansion.saturating_mul(2));
    Rect::from_corners(x, y, x.saturating_add(width), y.saturating_add(height))
        .clamp_to(page_width, page_height)
}

/// Detects text lines with `tesseract ... tsv`.
#[derive(Debug, Clone)]
pub struct TesseractLineDetector {
    cli: TesseractCli,
    language: String,
    expansion: u32,
}

impl TesseractLineDetector {
    /// Detect lines of `language` text with `cli`.
    pub fn new(cli: TesseractCli, language: impl Into<String>) -> Self {
        Self {
            cli,
            language: language.into(),
            expansion: 0,
        }
    }

    /// Grow every line box by `pixels` on each side.
    pub fn with_expansion(mut self, pixels: u32) -> Self {
        self.expansion = pixels;
        self
    }

    /// Margin added around each line box.
    pub fn expansion(&self) -> u32 {
        self.expansion
    }

    /// Regions for the line boxes of a TSV report on a `width x height` page.
    pub fn regions_from_tsv(&self, tsv: &str, width: u32, height: u32) -> Vec<Region> {
        parse_line_boxes(tsv)
            .into_iter()
            .filter_map(|rect| expand_line_box(rect, self.expansion, width, height))
            .map(Region::from_rect)
            .collect()
    }
}

impl RegionDetector for TesseractLineDetector {
    fn detect(&self, page: &RgbImage) -> Result<Vec<Region>> {
        let gray = imageops::grayscale(page);
        let png = encode_png(&gray)?;
        let tsv = self
            .cli
            .run(self.cli.tsv_command(&self.language, LayoutHint::Auto), &png)
            .map_err(|e| match e {
                Error::Ocr(msg) => Error::Ocr(format!("line detection failed: {}", msg)),
                other => other,
            })?;

        let regions = self.regions_from_tsv(&tsv, page.width(), page.height());
        log::debug!("Tesseract found {} text lines", regions.len());
        Ok(regions)
    }
}
