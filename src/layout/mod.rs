//! Layout analysis for OCR'd page blocks.
//!
//! - Area-based block ordering and geometric features
//! - Margin clustering (left offsets, vertical gaps)
//! - Paragraph role classification and emphasis
//! - Continuation merging into paragraphs

pub mod clustering;
pub mod continuation;
pub mod paragraph;
pub mod paragraph_classifier;
pub mod reading_order;
pub mod text_block;

// Re-export main types
pub use clustering::{cluster_values, MarginBand, MarginClusters};
pub use continuation::{continues, merge_continuations};
pub use paragraph::{Alignment, Paragraph, FIRST_LINE_INDENT_PT};
pub use paragraph_classifier::{ClassificationBands, ParagraphClassifier};
pub use reading_order::{order_regions, PageSize, PlacedRegion};
pub use text_block::{renumber, retain_min_chars, ColorSample, Role, TextBlock};
