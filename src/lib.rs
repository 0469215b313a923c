// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_range_contains)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # Layout Oxide
//!
//! Paragraph layout reconstruction for scanned documents.
//!
//! Page rasters whose text lines are outlined by a line marker go in; an
//! ordered list of paragraphs comes out, each with its text, alignment role
//! and emphasis, ready for a document writer.
//!
//! ## Stages
//!
//! - **Detection**: text line regions per page ([`ocr::TesseractLineDetector`],
//!   or [`ocr::MarkedRegionDetector`] for pre-marked pages)
//! - **Extraction**: area ordering, geometry, crop binarization, OCR, text
//!   normalization and the quality gate ([`extractors::BlockExtractor`])
//! - **Concatenation**: per-page records joined into one document
//!   ([`pipeline::PageRecordStore`])
//! - **Classification**: margin clustering and rule-based paragraph roles
//!   ([`layout::ParagraphClassifier`])
//! - **Merging**: continuation blocks folded into paragraphs
//!   ([`layout::merge_continuations`])
//!
//! ## Quick Start
//!
//! ```ignore
//! use layout_oxide::ocr::{MarkedRegionDetector, TesseractCli};
//! use layout_oxide::pipeline::{load_page_images, LayoutPipeline};
//! use layout_oxide::LayoutConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pages = load_page_images("scans/contract".as_ref())?;
//! let pipeline = LayoutPipeline::new(
//!     LayoutConfig::default(),
//!     MarkedRegionDetector::default(),
//!     TesseractCli::new(),
//! )?;
//!
//! for paragraph in pipeline.process_pages(&pages)? {
//!     println!("[{}] {}", paragraph.role, paragraph.display_text());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

/// Tunable constants
pub mod config;

// Page geometry
pub mod geometry;

// Block text cleanup
pub mod text;

// Detection, preprocessing and OCR
pub mod ocr;

// Layout analysis
pub mod layout;

// Per-page extraction
pub mod extractors;

// End-to-end pipeline
pub mod pipeline;

// Re-exports
pub use config::{LayoutConfig, LayoutConfigBuilder};
pub use error::{Error, Result};
pub use extractors::{BlockExtractor, PageBlocks};
pub use layout::{Alignment, Paragraph, Role, TextBlock};
pub use pipeline::{LayoutPipeline, PageImage};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
