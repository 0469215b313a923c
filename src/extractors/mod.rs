//! Block extraction from page rasters.

pub mod blocks;

pub use blocks::{BlockExtractor, PageBlocks};
