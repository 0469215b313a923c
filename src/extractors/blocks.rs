//! Per-page block extraction.
//!
//! Turns one page raster plus its detected regions into an ordered list of
//! OCR'd [`TextBlock`]s: regions are ordered by area, cropped, sampled for
//! color, binarized and recognized; the text is normalized and gated, and the
//! survivors are numbered from 1.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::geometry::Region;
use crate::layout::reading_order::{order_regions, PageSize, PlacedRegion};
use crate::layout::text_block::{renumber, TextBlock};
use crate::ocr::{average_color, binarize_for_ocr, blur_by_percentage, crop_region};
use crate::ocr::{OcrEngine, RegionDetector};
use crate::text::{passes_gate, TextNormalizer};

/// The finalized blocks of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBlocks {
    /// Page index the blocks belong to
    pub page_index: usize,
    /// Blocks in page order, numbered from 1
    pub blocks: Vec<TextBlock>,
}

impl PageBlocks {
    /// Create a page's block list.
    pub fn new(page_index: usize, blocks: Vec<TextBlock>) -> Self {
        Self { page_index, blocks }
    }

    /// Whether no block survived extraction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Extracts the text blocks of a page.
pub struct BlockExtractor<'a> {
    config: &'a LayoutConfig,
    engine: &'a dyn OcrEngine,
    normalizer: TextNormalizer,
}

impl<'a> BlockExtractor<'a> {
    /// Create an extractor recognizing text with `engine`.
    pub fn new(config: &'a LayoutConfig, engine: &'a dyn OcrEngine) -> Self {
        Self {
            config,
            engine,
            normalizer: TextNormalizer::new(),
        }
    }

    /// Detect the regions of `page` and extract its blocks.
    ///
    /// When a page blur is configured, detection runs on the blurred page
    /// while crops are taken from the original.
    pub fn extract_page(
        &self,
        page_index: usize,
        page: &RgbImage,
        detector: &dyn RegionDetector,
    ) -> Result<PageBlocks> {
        let regions = self.detect_regions(page, detector)?;
        log::debug!("Page {}: {} regions", page_index, regions.len());

        let blocks = self.extract_blocks(page, &regions);
        log::info!("Page {}: kept {} of {} blocks", page_index, blocks.len(), regions.len());
        Ok(PageBlocks::new(page_index, blocks))
    }

    /// Run `detector` on `page`, blurred first when a page blur is configured.
    pub fn detect_regions(
        &self,
        page: &RgbImage,
        detector: &dyn RegionDetector,
    ) -> Result<Vec<Region>> {
        match self.config.page_blur_percent {
            Some(percent) => detector.detect(&blur_by_percentage(page, percent)?),
            None => detector.detect(page),
        }
    }

    /// Extract blocks from already detected regions.
    ///
    /// A region whose OCR fails is logged and dropped; the page continues.
    pub fn extract_blocks(&self, page: &RgbImage, regions: &[Region]) -> Vec<TextBlock> {
        let size = PageSize::new(page.width(), page.height());
        let mut blocks: Vec<TextBlock> = order_regions(regions, size)
            .iter()
            .enumerate()
            .filter_map(|(idx, placed)| self.read_region(page, idx + 1, placed))
            .filter(|block| passes_gate(&block.text, self.config.min_text_chars))
            .collect();

        renumber(&mut blocks);
        blocks
    }

    fn read_region(&self, page: &RgbImage, order: usize, placed: &PlacedRegion) -> Option<TextBlock> {
        let crop = match crop_region(page, placed.rect) {
            Some(crop) => crop,
            None => {
                log::warn!("Region {:?} lies outside the page, skipping", placed.rect);
                return None;
            },
        };

        let color = average_color(&crop);
        let binary = binarize_for_ocr(&crop, self.config.crop_blur_sigma);
        let raw = match self.engine.recognize(
            &binary,
            &self.config.ocr_language,
            self.config.ocr_layout,
        ) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{} failed on region {:?}: {}", self.engine.name(), placed.rect, e);
                return None;
            },
        };

        let mut block = TextBlock::new(order, self.normalizer.normalize(&raw))
            .with_offsets(placed.left_offset, placed.right_offset)
            .with_gaps(placed.gap_before, placed.gap_after)
            .with_color(color);
        block.area = placed.area;
        Some(block)
    }
}
