//! Configuration for layout reconstruction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ocr::LayoutHint;

/// Tunable constants for block extraction, classification and merging.
///
/// The defaults reproduce the heuristics the classifier was tuned with for
/// single, double and justified-column prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum distance from the first value of a margin band for a value to join it.
    pub cluster_proximity: i64,

    /// A block is centered when `|left_offset - right_offset|` is below this.
    pub centering_tolerance: i64,

    /// A block is right-shifted when `left_offset - right_offset` exceeds this.
    pub right_shift_tolerance: i64,

    /// `gap_before` assigned to the first block of every page after the first.
    pub page_break_gap: i64,

    /// A block is emphasized when its brightest average channel is below this.
    pub emphasis_threshold: u16,

    /// Blocks with fewer characters than this are dropped during extraction.
    pub min_text_chars: usize,

    /// Language hint passed to the OCR engine.
    pub ocr_language: String,

    /// Layout hint passed to the OCR engine.
    pub ocr_layout: LayoutHint,

    /// Gaussian sigma used to denoise a block crop before binarization.
    pub crop_blur_sigma: f32,

    /// Optional page blur applied before region detection, in percent of the shorter side.
    pub page_blur_percent: Option<f32>,

    /// Regions narrower or shorter than this many pixels are ignored by the detector.
    pub min_region_side: u32,

    /// Pixels added on every side of a detected text line box.
    pub line_expansion: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            cluster_proximity: 20,
            centering_tolerance: 10,
            right_shift_tolerance: 10,
            page_break_gap: 10,
            emphasis_threshold: 200,
            min_text_chars: 2,
            ocr_language: "rus".to_string(),
            ocr_layout: LayoutHint::SingleBlock,
            crop_blur_sigma: 0.8,
            page_blur_percent: None,
            min_region_side: 2,
            line_expansion: 0,
        }
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }

    /// Load a configuration from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let config: LayoutConfig = serde_json::from_str(&data).map_err(|e| Error::DecodeFailure {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its valid domain.
    pub fn validate(&self) -> Result<()> {
        if let Some(percent) = self.page_blur_percent {
            check_range("page_blur_percent", percent as f64, 0.0, 100.0)?;
        }
        if self.crop_blur_sigma.is_nan() || self.crop_blur_sigma <= 0.0 {
            return Err(Error::ValueOutOfRange {
                name: "crop_blur_sigma",
                value: self.crop_blur_sigma as f64,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }
        check_range("emphasis_threshold", self.emphasis_threshold as f64, 0.0, 255.0)?;
        check_range("cluster_proximity", self.cluster_proximity as f64, 0.0, f64::MAX)?;
        check_range("centering_tolerance", self.centering_tolerance as f64, 0.0, f64::MAX)?;
        check_range("right_shift_tolerance", self.right_shift_tolerance as f64, 0.0, f64::MAX)?;
        check_range("page_break_gap", self.page_break_gap as f64, 0.0, f64::MAX)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(Error::ValueOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Builder for LayoutConfig with fluent API.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfigBuilder {
    config: LayoutConfig,
}

impl LayoutConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    /// Set the margin band proximity.
    pub fn cluster_proximity(mut self, proximity: i64) -> Self {
        self.config.cluster_proximity = proximity;
        self
    }

    /// Set the centering tolerance.
    pub fn centering_tolerance(mut self, tolerance: i64) -> Self {
        self.config.centering_tolerance = tolerance;
        self
    }

    /// Set the right-shift tolerance.
    pub fn right_shift_tolerance(mut self, tolerance: i64) -> Self {
        self.config.right_shift_tolerance = tolerance;
        self
    }

    /// Set the gap assigned to the first block of each following page.
    pub fn page_break_gap(mut self, gap: i64) -> Self {
        self.config.page_break_gap = gap;
        self
    }

    /// Set the emphasis darkness threshold.
    pub fn emphasis_threshold(mut self, threshold: u16) -> Self {
        self.config.emphasis_threshold = threshold;
        self
    }

    /// Set the minimum number of characters a block must keep.
    pub fn min_text_chars(mut self, chars: usize) -> Self {
        self.config.min_text_chars = chars;
        self
    }

    /// Set the OCR language hint.
    pub fn ocr_language(mut self, language: impl Into<String>) -> Self {
        self.config.ocr_language = language.into();
        self
    }

    /// Set the OCR layout hint.
    pub fn ocr_layout(mut self, layout: LayoutHint) -> Self {
        self.config.ocr_layout = layout;
        self
    }

    /// Set the crop denoising sigma.
    pub fn crop_blur_sigma(mut self, sigma: f32) -> Self {
        self.config.crop_blur_sigma = sigma;
        self
    }

    /// Blur pages before region detection.
    pub fn page_blur_percent(mut self, percent: f32) -> Self {
        self.config.page_blur_percent = Some(percent);
        self
    }

    /// Set the minimum region side length.
    pub fn min_region_side(mut self, side: u32) -> Self {
        self.config.min_region_side = side;
        self
    }

    /// Set the margin added around detected text lines.
    pub fn line_expansion(mut self, pixels: u32) -> Self {
        self.config.line_expansion = pixels;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<LayoutConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.cluster_proximity, 20);
        assert_eq!(config.centering_tolerance, 10);
        assert_eq!(config.page_break_gap, 10);
        assert_eq!(config.emphasis_threshold, 200);
        assert_eq!(config.ocr_language, "rus");
        assert_eq!(config.ocr_layout, LayoutHint::SingleBlock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = LayoutConfig::builder()
            .cluster_proximity(15)
            .ocr_language("eng")
            .page_blur_percent(5.0)
            .line_expansion(3)
            .build()
            .unwrap();

        assert_eq!(config.cluster_proximity, 15);
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.page_blur_percent, Some(5.0));
        assert_eq!(config.line_expansion, 3);
    }

    #[test]
    fn test_blur_percent_out_of_range() {
        let result = LayoutConfig::builder().page_blur_percent(101.0).build();
        assert!(matches!(
            result,
            Err(Error::ValueOutOfRange {
                name: "page_blur_percent",
                ..
            })
        ));

        let result = LayoutConfig::builder().page_blur_percent(-1.0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_sigma_rejected() {
        let result = LayoutConfig::builder().crop_blur_sigma(0.0).build();
        assert!(matches!(
            result,
            Err(Error::ValueOutOfRange {
                name: "crop_blur_sigma",
                ..
            })
        ));
    }

    #[test]
    fn test_emphasis_threshold_above_255_rejected() {
        assert!(LayoutConfig::builder().emphasis_threshold(255).build().is_ok());

        let config: LayoutConfig = serde_json::from_str(r#"{"emphasis_threshold": 300}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::ValueOutOfRange {
                name: "emphasis_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_emphasis_threshold_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{"emphasis_threshold": 300}"#).unwrap();
        assert!(matches!(
            LayoutConfig::from_json_file(&path),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"ocr_language": "eng"}"#).unwrap();
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.cluster_proximity, 20);
    }
}
