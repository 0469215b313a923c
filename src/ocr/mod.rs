//! Region detection, raster preprocessing and OCR.
//!
//! # Architecture
//!
//! 1. **Detection**: a [`RegionDetector`] finds the text regions of a page
//! 2. **Preprocessing**: each region is cropped, averaged and binarized
//! 3. **Recognition**: an [`OcrEngine`] reads the text of a binarized crop
//!
//! Both boundaries are traits so the pipeline can run against any detector or
//! engine. [`TesseractLineDetector`] finds the lines of an unmarked scan,
//! [`MarkedRegionDetector`] reads rectangles already drawn on the page, and
//! [`TesseractCli`] is the stock engine.

mod detector;
mod engine;
mod line_detector;
mod preprocessor;

pub use detector::{
    is_marker_pixel, outline_regions, to_hsv, MarkedRegionDetector, RegionDetector, MARKER_COLOR,
};
pub use engine::{encode_png, LayoutHint, OcrEngine, TesseractCli};
pub use line_detector::{expand_line_box, parse_line_boxes, TesseractLineDetector, LINE_LEVEL};
pub use preprocessor::{
    average_color, binarize_for_ocr, blur_by_percentage, blur_kernel_size, crop_region,
    otsu_threshold,
};
