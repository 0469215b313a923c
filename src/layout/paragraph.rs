//! Final paragraph records handed to a document writer.

use serde::{Deserialize, Serialize};

use crate::layout::text_block::{Role, TextBlock};

/// First-line indent of a left-aligned paragraph start, in points.
pub const FIRST_LINE_INDENT_PT: f32 = 35.0;

/// Horizontal alignment a writer applies to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Writer default
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
    /// Justified
    Justify,
}

impl Role {
    /// Alignment a writer uses for a paragraph with this role.
    ///
    /// Continuation roles only survive merging when they follow a paragraph of
    /// another alignment and render with the writer default.
    pub fn alignment(&self) -> Alignment {
        match self {
            Role::CenteredStart => Alignment::Center,
            Role::LeftStart => Alignment::Justify,
            Role::RightStart => Alignment::Right,
            Role::CenteredContinuation | Role::LeftContinuation | Role::RightContinuation => {
                Alignment::Left
            },
        }
    }

    /// First-line indent in points (only left-aligned starts are indented).
    pub fn first_line_indent_pt(&self) -> Option<f32> {
        match self {
            Role::LeftStart => Some(FIRST_LINE_INDENT_PT),
            _ => None,
        }
    }
}

/// One output paragraph: `{text, order, role, emphasis}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Merged text
    pub text: String,
    /// 1-based position in the document
    pub order: usize,
    /// Role of the paragraph's first block
    pub role: Role,
    /// Render bold
    pub emphasis: bool,
}

impl Paragraph {
    /// Build a paragraph from a merged block.
    ///
    /// An unclassified block becomes a non-emphasized left-aligned start.
    pub fn from_block(block: TextBlock) -> Self {
        Self {
            text: block.text,
            order: block.order,
            role: block.role.unwrap_or(Role::LeftStart),
            emphasis: block.emphasis.unwrap_or(false),
        }
    }

    /// Text as a writer renders it, with embedded newlines removed.
    pub fn display_text(&self) -> String {
        self.text.chars().filter(|&c| c != '\n' && c != '\r').collect()
    }

    /// Alignment of the paragraph.
    pub fn alignment(&self) -> Alignment {
        self.role.alignment()
    }
}

impl From<TextBlock> for Paragraph {
    fn from(block: TextBlock) -> Self {
        Self::from_block(block)
    }
}
