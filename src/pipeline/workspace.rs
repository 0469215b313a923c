//! Numbered run workspaces.
//!
//! Every pipeline run can keep its intermediate artifacts (page images,
//! marked regions, page records) in a fresh `exp_<n>` directory under a base
//! directory. The next number is computed from what already exists, so no
//! counter has to live between runs.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;
use crate::pipeline::records::PageRecordStore;

/// Prefix of run directory names.
pub const RUN_PREFIX: &str = "exp_";

lazy_static! {
    static ref RE_RUN_NAME: Regex = Regex::new(r"^exp_(\d+)$").unwrap();
}

/// Next free run number given the names already present: one past the
/// highest `exp_<n>`, or 1 when there is none.
///
/// # Examples
///
/// ```
/// use layout_oxide::pipeline::next_run_index;
///
/// assert_eq!(next_run_index(["exp_1", "exp_3", "notes"]), 4);
/// assert_eq!(next_run_index(Vec::<String>::new()), 1);
/// ```
pub fn next_run_index<I, S>(existing_names: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    existing_names
        .into_iter()
        .filter_map(|name| {
            RE_RUN_NAME
                .captures(name.as_ref())
                .and_then(|caps| caps[1].parse::<usize>().ok())
        })
        .max()
        .map_or(1, |max| max + 1)
}

/// One run's directory tree: `exp_<n>/{images,regions,records}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWorkspace {
    root: PathBuf,
    index: usize,
}

impl RunWorkspace {
    /// Create the next numbered workspace under `base` (created if missing).
    pub fn create_next(base: &Path) -> Result<Self> {
        fs::create_dir_all(base)?;
        let names: Vec<String> = fs::read_dir(base)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();

        let index = next_run_index(&names);
        let workspace = Self {
            root: base.join(format!("{}{}", RUN_PREFIX, index)),
            index,
        };
        for dir in [workspace.images_dir(), workspace.regions_dir(), workspace.records_dir()] {
            fs::create_dir_all(dir)?;
        }
        log::info!("Created run workspace {}", workspace.root.display());
        Ok(workspace)
    }

    /// Run directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run number.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Page rasters.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Pages with marked regions.
    pub fn regions_dir(&self) -> PathBuf {
        self.root.join("regions")
    }

    /// Per-page block records.
    pub fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    /// Record store over [`Self::records_dir`].
    pub fn record_store(&self) -> PageRecordStore {
        PageRecordStore::new(self.records_dir())
    }

    /// Save a page raster as `images/page_<N>.png`.
    pub fn save_page_image(&self, page_index: usize, image: &RgbImage) -> Result<PathBuf> {
        let path = self.images_dir().join(format!("page_{}.png", page_index));
        image.save(&path)?;
        Ok(path)
    }

    /// Save a page with its regions outlined as `regions/marked_page_<N>.png`.
    pub fn save_marked_page(&self, page_index: usize, image: &RgbImage) -> Result<PathBuf> {
        let path = self.regions_dir().join(format!("marked_page_{}.png", page_index));
        image.save(&path)?;
        Ok(path)
    }
}
