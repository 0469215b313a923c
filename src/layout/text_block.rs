//! Text block representation for layout reconstruction.
//!
//! A [`TextBlock`] is one detected, OCR'd region of a page together with the
//! geometric features the classifier works from. Blocks are created per page,
//! concatenated across pages, classified once and finally merged into
//! paragraphs.

use serde::{Deserialize, Serialize};

/// Average color of a block's crop, one value per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColorSample(pub [u8; 3]);

impl ColorSample {
    /// Create a sample from three channel averages.
    pub fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self([c0, c1, c2])
    }

    /// White: the sample of an empty crop.
    pub fn white() -> Self {
        Self([255, 255, 255])
    }

    /// The brightest channel.
    pub fn max_channel(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Whether every channel is below `threshold`, i.e. the crop is generally dark.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::layout::ColorSample;
    ///
    /// assert!(ColorSample::new(120, 130, 190).is_dark(200));
    /// assert!(!ColorSample::new(120, 130, 230).is_dark(200));
    /// ```
    pub fn is_dark(&self, threshold: u16) -> bool {
        u16::from(self.max_channel()) < threshold
    }
}

/// Paragraph role of a block: its alignment and whether it starts a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// First line of a centered paragraph
    #[serde(rename = "cs")]
    CenteredStart,
    /// Following line of a centered paragraph
    #[serde(rename = "cc")]
    CenteredContinuation,
    /// First line of a left-aligned (indented, justified) paragraph
    #[serde(rename = "ls")]
    LeftStart,
    /// Following line of a left-aligned paragraph
    #[serde(rename = "lc")]
    LeftContinuation,
    /// First line of a right-aligned paragraph
    #[serde(rename = "rs")]
    RightStart,
    /// Following line of a right-aligned paragraph
    #[serde(rename = "rc")]
    RightContinuation,
}

impl Role {
    /// Short tag used in persisted records.
    pub fn code(&self) -> &'static str {
        match self {
            Role::CenteredStart => "cs",
            Role::CenteredContinuation => "cc",
            Role::LeftStart => "ls",
            Role::LeftContinuation => "lc",
            Role::RightStart => "rs",
            Role::RightContinuation => "rc",
        }
    }

    /// Whether this role opens a paragraph.
    pub fn is_start(&self) -> bool {
        matches!(self, Role::CenteredStart | Role::LeftStart | Role::RightStart)
    }

    /// Whether this role continues a paragraph.
    pub fn is_continuation(&self) -> bool {
        !self.is_start()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One OCR'd text region with its layout features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// 1-based position, contiguous over the blocks of the current stage
    pub order: usize,
    /// Normalized text
    pub text: String,
    /// Distance from the block's left edge to the page's left edge
    pub left_offset: i64,
    /// Distance from the block's right edge to the page's right edge
    pub right_offset: i64,
    /// Vertical distance to the previous block (or to the page top)
    pub gap_before: i64,
    /// Vertical distance to the next block (or to the page bottom)
    pub gap_after: i64,
    /// Bounding area in pixels; an ordering signal only
    pub area: u64,
    /// Average color of the crop
    pub color_sample: ColorSample,
    /// Paragraph role, set once by the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Bold flag, set by the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<bool>,
}

impl TextBlock {
    /// Create an unclassified block with zeroed geometry.
    pub fn new(order: usize, text: impl Into<String>) -> Self {
        Self {
            order,
            text: text.into(),
            left_offset: 0,
            right_offset: 0,
            gap_before: 0,
            gap_after: 0,
            area: 0,
            color_sample: ColorSample::white(),
            role: None,
            emphasis: None,
        }
    }

    /// Set horizontal offsets.
    pub fn with_offsets(mut self, left: i64, right: i64) -> Self {
        self.left_offset = left;
        self.right_offset = right;
        self
    }

    /// Set vertical gaps.
    pub fn with_gaps(mut self, before: i64, after: i64) -> Self {
        self.gap_before = before;
        self.gap_after = after;
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the color sample.
    pub fn with_color(mut self, color: ColorSample) -> Self {
        self.color_sample = color;
        self
    }

    /// Character count of the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Append another block's text, separated by a single space.
    pub fn append_text(&mut self, other: &str) {
        self.text.push(' ');
        self.text.push_str(other);
    }
}

/// Reassign `order` as 1, 2, 3, ... in slice order.
pub fn renumber(blocks: &mut [TextBlock]) {
    for (idx, block) in blocks.iter_mut().enumerate() {
        block.order = idx + 1;
    }
}

/// Drop blocks whose text has fewer than `min_chars` characters, then
/// renumber the survivors in their existing order.
pub fn retain_min_chars(mut blocks: Vec<TextBlock>, min_chars: usize) -> Vec<TextBlock> {
    blocks.retain(|b| b.char_count() >= min_chars);
    blocks.sort_by_key(|b| b.order);
    renumber(&mut blocks);
    blocks
}
