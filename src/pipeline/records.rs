//! Per-page block records on disk and cross-page concatenation.
//!
//! Each page's finalized blocks are persisted as `processed_page_<N>.json`, a
//! pretty-printed JSON array of block records. Concatenation discovers the
//! records of a directory, orders them by the page index embedded in the file
//! name (names without one sort last) and joins them into a single document.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::extractors::PageBlocks;
use crate::layout::text_block::TextBlock;

/// File name prefix of per-page records.
pub const RECORD_PREFIX: &str = "processed_page_";

/// File name of the concatenated document; never treated as a page record.
pub const CONCATENATED_FILE: &str = "concatenated.json";

lazy_static! {
    static ref RE_PAGE_INDEX: Regex = Regex::new(r"processed_page_(\d+)").unwrap();
}

/// Page index embedded in a record name, if any.
///
/// # Examples
///
/// ```
/// use layout_oxide::pipeline::parse_page_index;
///
/// assert_eq!(parse_page_index("processed_page_12.json"), Some(12));
/// assert_eq!(parse_page_index("notes.json"), None);
/// ```
pub fn parse_page_index(name: &str) -> Option<usize> {
    RE_PAGE_INDEX
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Record file name for a page.
pub fn record_file_name(page_index: usize) -> String {
    format!("{}{}.json", RECORD_PREFIX, page_index)
}

/// Join page block lists into one document.
///
/// Pages are taken in the given order and `order` is rewritten to a single
/// counter starting at 1. The first block of every page after the first gets
/// `gap_before = page_break_gap`: the distance across a page break carries no
/// layout information.
pub fn concatenate_pages<I>(pages: I, page_break_gap: i64) -> Vec<TextBlock>
where
    I: IntoIterator<Item = PageBlocks>,
{
    let mut document = Vec::new();
    for (page_pos, page) in pages.into_iter().enumerate() {
        for (block_pos, mut block) in page.blocks.into_iter().enumerate() {
            if page_pos > 0 && block_pos == 0 {
                block.gap_before = page_break_gap;
            }
            block.order = document.len() + 1;
            document.push(block);
        }
    }
    document
}

fn record_index(path: &Path) -> Option<usize> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_page_index)
}

/// A directory of per-page block records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecordStore {
    dir: PathBuf,
}

impl PageRecordStore {
    /// Open a store rooted at `dir`. Nothing is touched until it is used.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a page's blocks, replacing any earlier record of that page.
    pub fn save(&self, page: &PageBlocks) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(record_file_name(page.page_index));
        let json = serde_json::to_string_pretty(&page.blocks)?;
        fs::write(&path, json)?;
        log::debug!("Saved {} blocks to {}", page.blocks.len(), path.display());
        Ok(path)
    }

    /// Record files in page order: indexed names ascending, then the rest by name.
    ///
    /// Fails with [`Error::InputNotFound`] when the directory does not exist
    /// and [`Error::NoInputUnits`] when it holds no record.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(Error::InputNotFound(self.dir.clone()));
        }

        let mut records: Vec<(Option<usize>, String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if !name.ends_with(".json") || name == CONCATENATED_FILE || !path.is_file() {
                continue;
            }
            records.push((parse_page_index(&name), name, path));
        }

        if records.is_empty() {
            return Err(Error::NoInputUnits(format!(
                "no page records in {}",
                self.dir.display()
            )));
        }

        records.sort_by(|a, b| {
            let key_a = a.0.unwrap_or(usize::MAX);
            let key_b = b.0.unwrap_or(usize::MAX);
            key_a.cmp(&key_b).then_with(|| a.1.cmp(&b.1))
        });
        Ok(records.into_iter().map(|(_, _, path)| path).collect())
    }

    /// Read one record file.
    pub fn load_blocks(path: &Path) -> Result<Vec<TextBlock>> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| Error::DecodeFailure {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load every readable record in page order.
    ///
    /// Unreadable records are logged and skipped. Records without an index in
    /// their name are numbered after the highest indexed page. Fails with
    /// [`Error::NoInputUnits`] when no record could be read.
    pub fn load_all(&self) -> Result<Vec<PageBlocks>> {
        let paths = self.discover()?;
        let mut next_unindexed = paths
            .iter()
            .filter_map(|p| record_index(p))
            .max()
            .map_or(0, |max| max + 1);

        let mut pages = Vec::with_capacity(paths.len());
        for path in &paths {
            let blocks = match Self::load_blocks(path) {
                Ok(blocks) => blocks,
                Err(e) => {
                    log::error!("Skipping record {}: {}", path.display(), e);
                    continue;
                },
            };
            let page_index = record_index(path).unwrap_or_else(|| {
                next_unindexed += 1;
                next_unindexed - 1
            });
            pages.push(PageBlocks::new(page_index, blocks));
        }

        if pages.is_empty() {
            return Err(Error::NoInputUnits(format!(
                "no readable page records in {}",
                self.dir.display()
            )));
        }
        Ok(pages)
    }

    /// Load all records and join them into one document.
    pub fn concatenate(&self, page_break_gap: i64) -> Result<Vec<TextBlock>> {
        let pages = self.load_all()?;
        log::info!("Concatenating {} page records from {}", pages.len(), self.dir.display());
        Ok(concatenate_pages(pages, page_break_gap))
    }

    /// Write a concatenated document next to the page records.
    pub fn write_concatenated(&self, blocks: &[TextBlock]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CONCATENATED_FILE);
        fs::write(&path, serde_json::to_string_pretty(blocks)?)?;
        Ok(path)
    }
}
