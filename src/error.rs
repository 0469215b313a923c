//! Error types for layout reconstruction.
//!
//! Failures fall into two groups. Unit-level failures (one block, one page, one
//! record file) are reported and skipped by the caller that owns the unit.
//! Caller errors such as an out-of-range configuration value are fatal.

use std::path::PathBuf;

/// Result type alias for layout reconstruction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a document layout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source raster or record does not exist
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A structured record could not be read or parsed
    #[error("Failed to decode {source_name}: {reason}")]
    DecodeFailure {
        /// Name of the record or file that failed to decode
        source_name: String,
        /// Reason for the failure
        reason: String,
    },

    /// An expected collection of units is empty
    #[error("No input units: {0}")]
    NoInputUnits(String),

    /// A configuration value lies outside its valid domain
    #[error("Value out of range: {name} = {value} (expected {min}..={max})")]
    ValueOutOfRange {
        /// Name of the offending setting
        name: &'static str,
        /// Value that was supplied
        value: f64,
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value
        max: f64,
    },

    /// The external OCR engine failed
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this failure is confined to a single block, page or file.
    ///
    /// Unit-level failures are logged and the unit is skipped; everything else
    /// is returned to the caller.
    pub fn is_unit_level(&self) -> bool {
        !matches!(self, Error::ValueOutOfRange { .. })
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
