//! End-to-end layout reconstruction pipeline.
//!
//! ```text
//! page rasters
//!     ↓
//! [RegionDetector] + [BlockExtractor] (per page, in parallel)
//!     ↓
//! PageBlocks[] ──→ optional PageRecordStore (processed_page_<N>.json)
//!     ↓
//! concatenate_pages (single ordered document)
//!     ↓
//! ParagraphClassifier (roles + emphasis)
//!     ↓
//! merge_continuations
//!     ↓
//! Paragraph[]
//! ```
//!
//! Failures are isolated per unit: a block whose OCR fails is dropped from
//! its page, a page that fails is dropped from the document. Only a document
//! with no surviving page is an error.

pub mod records;
pub mod workspace;

pub use records::{
    concatenate_pages, parse_page_index, record_file_name, PageRecordStore, CONCATENATED_FILE,
    RECORD_PREFIX,
};
pub use workspace::{next_run_index, RunWorkspace, RUN_PREFIX};

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::extractors::{BlockExtractor, PageBlocks};
use crate::layout::{
    merge_continuations, retain_min_chars, Paragraph, ParagraphClassifier, TextBlock,
};
use crate::ocr::{outline_regions, OcrEngine, RegionDetector};

/// Blocks with fewer characters are dropped before classification.
pub const DOCUMENT_MIN_CHARS: usize = 2;

/// File extensions accepted as page rasters.
const PAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

lazy_static! {
    static ref RE_TRAILING_NUMBER: Regex = Regex::new(r"(\d+)$").unwrap();
}

/// One page raster with its index in the document.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Position of the page in the document
    pub page_index: usize,
    /// Page raster
    pub image: RgbImage,
}

impl PageImage {
    /// Wrap a raster.
    pub fn new(page_index: usize, image: RgbImage) -> Self {
        Self { page_index, image }
    }
}

/// Load the page rasters of a directory in page order.
///
/// The page index is the trailing number of the file stem (`page_3.png` is
/// page 3); files without one follow the numbered pages in name order.
/// Unreadable images are logged and skipped.
pub fn load_page_images(dir: &Path) -> Result<Vec<PageImage>> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<(Option<usize>, String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_page = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| PAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !is_page || !path.is_file() {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| RE_TRAILING_NUMBER.captures(stem))
            .and_then(|caps| caps[1].parse::<usize>().ok());
        files.push((index, name, path));
    }

    if files.is_empty() {
        return Err(Error::NoInputUnits(format!("no page images in {}", dir.display())));
    }

    files.sort_by(|a, b| {
        a.0.unwrap_or(usize::MAX)
            .cmp(&b.0.unwrap_or(usize::MAX))
            .then_with(|| a.1.cmp(&b.1))
    });
    let mut next_unindexed = files.iter().filter_map(|f| f.0).max().map_or(0, |max| max + 1);

    let mut pages = Vec::with_capacity(files.len());
    for (index, _, path) in files {
        let image = match image::open(&path) {
            Ok(image) => image.to_rgb8(),
            Err(e) => {
                log::warn!("Skipping unreadable page {}: {}", path.display(), e);
                continue;
            },
        };
        let page_index = index.unwrap_or_else(|| {
            next_unindexed += 1;
            next_unindexed - 1
        });
        pages.push(PageImage::new(page_index, image));
    }
    Ok(pages)
}

/// Classify a concatenated document and merge it into paragraphs.
///
/// Blocks shorter than [`DOCUMENT_MIN_CHARS`] are dropped first and the rest
/// renumbered.
pub fn reconstruct_document(blocks: Vec<TextBlock>, config: &LayoutConfig) -> Vec<Paragraph> {
    let mut blocks = retain_min_chars(blocks, DOCUMENT_MIN_CHARS);
    ParagraphClassifier::from_config(config).classify_document(&mut blocks);
    merge_continuations(blocks)
        .into_iter()
        .map(Paragraph::from_block)
        .collect()
}

/// Runs detection, extraction, concatenation, classification and merging.
pub struct LayoutPipeline {
    config: LayoutConfig,
    detector: Box<dyn RegionDetector>,
    engine: Box<dyn OcrEngine>,
    record_store: Option<PageRecordStore>,
    workspace: Option<RunWorkspace>,
}

impl LayoutPipeline {
    /// Create a pipeline. Fails when `config` does not validate.
    pub fn new(
        config: LayoutConfig,
        detector: impl RegionDetector + 'static,
        engine: impl OcrEngine + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: Box::new(detector),
            engine: Box::new(engine),
            record_store: None,
            workspace: None,
        })
    }

    /// Persist every extracted page into `store`.
    pub fn with_record_store(mut self, store: PageRecordStore) -> Self {
        self.record_store = Some(store);
        self
    }

    /// Keep every page raster, its marked regions and its record in `workspace`.
    pub fn with_workspace(self, workspace: RunWorkspace) -> Self {
        let mut pipeline = self.with_record_store(workspace.record_store());
        pipeline.workspace = Some(workspace);
        pipeline
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Extract the blocks of every page, in page-index order.
    ///
    /// Pages run in parallel. A page that fails is logged and left out; a
    /// record that cannot be saved is logged and the page kept.
    pub fn extract_pages(&self, pages: &[PageImage]) -> Vec<PageBlocks> {
        let mut ordered: Vec<&PageImage> = pages.iter().collect();
        ordered.sort_by_key(|p| p.page_index);

        let extractor = BlockExtractor::new(&self.config, self.engine.as_ref());
        let extracted: Vec<PageBlocks> = ordered
            .par_iter()
            .filter_map(|page| match self.extract_page(&extractor, page) {
                Ok(blocks) => Some(blocks),
                Err(e) => {
                    log::error!("Page {} failed: {}", page.page_index, e);
                    None
                },
            })
            .collect();

        if let Some(store) = &self.record_store {
            for page in &extracted {
                if let Err(e) = store.save(page) {
                    log::error!("Could not save record of page {}: {}", page.page_index, e);
                }
            }
        }
        extracted
    }

    fn extract_page(
        &self,
        extractor: &BlockExtractor<'_>,
        page: &PageImage,
    ) -> Result<PageBlocks> {
        let regions = extractor.detect_regions(&page.image, self.detector.as_ref())?;
        log::debug!("Page {}: {} regions", page.page_index, regions.len());

        if let Some(workspace) = &self.workspace {
            let marked = outline_regions(&page.image, &regions);
            let saved = workspace
                .save_page_image(page.page_index, &page.image)
                .and_then(|_| workspace.save_marked_page(page.page_index, &marked));
            if let Err(e) = saved {
                log::warn!("Could not save images of page {}: {}", page.page_index, e);
            }
        }

        let blocks = extractor.extract_blocks(&page.image, &regions);
        log::info!(
            "Page {}: kept {} of {} blocks",
            page.page_index,
            blocks.len(),
            regions.len()
        );
        Ok(PageBlocks::new(page.page_index, blocks))
    }

    /// Reconstruct the paragraphs of a document from its page rasters.
    ///
    /// Fails with [`Error::NoInputUnits`] when no page could be processed.
    pub fn process_pages(&self, pages: &[PageImage]) -> Result<Vec<Paragraph>> {
        let extracted = self.extract_pages(pages);
        if extracted.is_empty() {
            return Err(Error::NoInputUnits(format!(
                "none of {} pages could be processed",
                pages.len()
            )));
        }

        let blocks = concatenate_pages(extracted, self.config.page_break_gap);
        if let Some(store) = &self.record_store {
            if let Err(e) = store.write_concatenated(&blocks) {
                log::warn!("Could not write concatenated document: {}", e);
            }
        }
        log::info!("Document has {} blocks", blocks.len());
        Ok(self.reconstruct(blocks))
    }

    /// Classify and merge an already concatenated document.
    pub fn reconstruct(&self, blocks: Vec<TextBlock>) -> Vec<Paragraph> {
        reconstruct_document(blocks, &self.config)
    }
}
