//! Paragraph role classification from margin statistics.
//!
//! This module assigns every block of a document a [`Role`] (alignment plus
//! paragraph start/continuation) and an emphasis flag. Roles are derived from
//! document-wide margin bands: the left offsets and vertical gaps of all blocks
//! are clustered, and each block is compared to the most common bands.

use crate::config::LayoutConfig;
use crate::layout::clustering::{cluster_values, MarginBand};
use crate::layout::text_block::{Role, TextBlock};

/// Margin bands consulted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationBands {
    /// Most common left-offset band
    pub primary_left: Option<MarginBand>,
    /// Second most common left-offset band
    pub secondary_left: Option<MarginBand>,
    /// Upper bound of the most common `gap_before` band; gaps up to this
    /// value count as "tight"
    pub gap_limit: i64,
}

impl ClassificationBands {
    /// Compute bands over every block of a document.
    ///
    /// A missing band is treated as empty, and a missing gap band as a limit of 0.
    pub fn from_blocks(blocks: &[TextBlock], proximity: i64) -> Self {
        let left = cluster_values(blocks.iter().map(|b| b.left_offset), proximity);
        let gaps = cluster_values(blocks.iter().map(|b| b.gap_before), proximity);

        Self {
            primary_left: left.rank(0).copied(),
            secondary_left: left.rank(1).copied(),
            gap_limit: gaps.rank(0).map(|b| b.max).unwrap_or(0),
        }
    }

    fn in_primary(&self, left_offset: i64) -> bool {
        self.primary_left.is_some_and(|b| b.contains(left_offset))
    }

    fn in_secondary(&self, left_offset: i64) -> bool {
        self.secondary_left.is_some_and(|b| b.contains(left_offset))
    }
}

/// Rule-based classifier mapping block geometry to a paragraph role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphClassifier {
    proximity: i64,
    centering_tolerance: i64,
    right_shift_tolerance: i64,
    emphasis_threshold: u16,
}

impl Default for ParagraphClassifier {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl ParagraphClassifier {
    /// Create a classifier using the thresholds of `config`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            proximity: config.cluster_proximity,
            centering_tolerance: config.centering_tolerance,
            right_shift_tolerance: config.right_shift_tolerance,
            emphasis_threshold: config.emphasis_threshold,
        }
    }

    /// Classify one block that is not the first of its document.
    ///
    /// Rules are evaluated in order and the first match wins:
    ///
    /// | left offset              | shape          | gap    | role |
    /// |--------------------------|----------------|--------|------|
    /// | primary band             |                | tight  | `lc` |
    /// | primary band             |                | loose  | `ls` |
    /// | secondary band           |                | tight  | `ls` |
    /// | outside both bands       | centered       | tight  | `cc` |
    /// | outside both bands       | centered       | loose  | `cs` |
    /// | outside both bands       | right-shifted  | tight  | `rc` |
    /// | outside both bands       | right-shifted  | loose  | `rs` |
    /// | anything else            |                |        | `ls` |
    pub fn classify(&self, block: &TextBlock, bands: &ClassificationBands) -> Role {
        let left = block.left_offset;
        let in_primary = bands.in_primary(left);
        let in_secondary = bands.in_secondary(left);
        let tight = block.gap_before <= bands.gap_limit;

        if in_primary {
            return if tight {
                Role::LeftContinuation
            } else {
                Role::LeftStart
            };
        }
        if in_secondary {
            // Loose secondary-band blocks reach the fallback, which is also `ls`.
            return Role::LeftStart;
        }

        let centered = (left - block.right_offset).abs() < self.centering_tolerance;
        if centered {
            // A tight centered block is always a continuation; the rule that
            // would promote some of them to starts has the same guard.
            return if tight {
                Role::CenteredContinuation
            } else {
                Role::CenteredStart
            };
        }

        if left - block.right_offset > self.right_shift_tolerance {
            return if tight {
                Role::RightContinuation
            } else {
                Role::RightStart
            };
        }

        Role::LeftStart
    }

    /// Whether a block's color sample is dark enough to render bold.
    pub fn is_emphasized(&self, block: &TextBlock) -> bool {
        block.color_sample.is_dark(self.emphasis_threshold)
    }

    /// Assign role and emphasis to every block of a document, in place.
    ///
    /// The first block is always [`Role::CenteredStart`].
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::layout::{ParagraphClassifier, Role, TextBlock};
    ///
    /// let mut blocks = vec![
    ///     TextBlock::new(1, "ДОГОВОР").with_offsets(80, 80).with_gaps(40, 12),
    ///     TextBlock::new(2, "Пункт 1.").with_offsets(20, 30).with_gaps(12, 5),
    /// ];
    /// ParagraphClassifier::default().classify_document(&mut blocks);
    /// assert_eq!(blocks[0].role, Some(Role::CenteredStart));
    /// assert_eq!(blocks[1].emphasis, Some(false));
    /// ```
    pub fn classify_document(&self, blocks: &mut [TextBlock]) {
        let bands = ClassificationBands::from_blocks(blocks, self.proximity);
        log::debug!(
            "Classifying {} blocks: primary left band {:?}, secondary {:?}, gap limit {}",
            blocks.len(),
            bands.primary_left.map(|b| b.label()),
            bands.secondary_left.map(|b| b.label()),
            bands.gap_limit
        );

        for (idx, block) in blocks.iter_mut().enumerate() {
            let role = if idx == 0 {
                Role::CenteredStart
            } else {
                self.classify(block, &bands)
            };
            block.role = Some(role);
            block.emphasis = Some(self.is_emphasized(block));
        }
    }
}
