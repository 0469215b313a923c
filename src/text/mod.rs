//! Block text cleanup: OCR misread repair and the quality gate.

pub mod normalizer;
pub mod quality;

pub use normalizer::{collapse_whitespace, normalize_text, TextNormalizer};
pub use quality::{assess_quality, passes_gate, QualityVerdict};
