//! Quality gate for recognized block text.
//!
//! Scanned pages produce many tiny regions that hold noise rather than text:
//! specks, stamp fragments, isolated letters. The gate scores a block from
//! the lengths of its whitespace-separated tokens.

/// Verdict of the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityVerdict {
    /// OCR noise; the block is dropped
    Reject,
    /// Short but plausible text; the block is kept
    Marginal,
    /// Regular text
    Accept,
}

impl QualityVerdict {
    /// Whether a block with this verdict survives extraction.
    pub fn is_kept(&self) -> bool {
        !matches!(self, QualityVerdict::Reject)
    }
}

/// Score a block's text.
///
/// Lengths are counted in characters. Text without any token is rejected.
///
/// # Examples
///
/// ```
/// use layout_oxide::text::{assess_quality, QualityVerdict};
///
/// assert_eq!(assess_quality("a b"), QualityVerdict::Reject);
/// assert_eq!(assess_quality("ст. 5"), QualityVerdict::Reject);
/// assert_eq!(assess_quality("Статья"), QualityVerdict::Marginal);
/// assert_eq!(assess_quality("Статья 5. Общие положения"), QualityVerdict::Accept);
/// ```
pub fn assess_quality(text: &str) -> QualityVerdict {
    let lengths: Vec<usize> = text.split_whitespace().map(|w| w.chars().count()).collect();
    let Some(&shortest) = lengths.iter().min() else {
        return QualityVerdict::Reject;
    };
    let total = text.chars().count();
    let single_chars = lengths.iter().filter(|&&len| len == 1).count();

    if total < 8 && shortest == 1 {
        QualityVerdict::Reject
    } else if total < 20 && single_chars > 2 {
        QualityVerdict::Reject
    } else if total < 8 {
        QualityVerdict::Marginal
    } else {
        QualityVerdict::Accept
    }
}

/// Whether a block's text survives extraction: at least `min_chars`
/// characters and not rejected by the gate.
pub fn passes_gate(text: &str, min_chars: usize) -> bool {
    text.chars().count() >= min_chars && assess_quality(text).is_kept()
}
