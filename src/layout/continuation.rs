//! Merging of continuation blocks into paragraphs.

use crate::layout::text_block::{renumber, Role, TextBlock};

/// Whether `current` continues the paragraph held by `pending`.
///
/// Only exact role pairs merge: a continuation joins a start or continuation
/// of the same alignment.
pub fn continues(pending: Role, current: Role) -> bool {
    use Role::*;
    matches!(
        (pending, current),
        (LeftStart, LeftContinuation)
            | (LeftContinuation, LeftContinuation)
            | (CenteredStart, CenteredContinuation)
            | (CenteredContinuation, CenteredContinuation)
            | (RightStart, RightContinuation)
            | (RightContinuation, RightContinuation)
    )
}

/// Fold classified blocks into paragraphs.
///
/// A block that continues the pending paragraph has its text appended to it
/// (separated by one space) and is discarded; the pending block keeps its own
/// role and emphasis. Any other block closes the pending paragraph and becomes
/// the new pending one. The result is renumbered from 1.
///
/// Unclassified blocks never merge.
///
/// # Examples
///
/// ```
/// use layout_oxide::layout::{merge_continuations, Role, TextBlock};
///
/// let blocks = vec![
///     TextBlock::new(1, "Пункт 1.").with_role(Role::LeftStart),
///     TextBlock::new(2, "продолжение текста").with_role(Role::LeftContinuation),
/// ];
/// let merged = merge_continuations(blocks);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].text, "Пункт 1. продолжение текста");
/// assert_eq!(merged[0].order, 1);
/// ```
pub fn merge_continuations(blocks: Vec<TextBlock>) -> Vec<TextBlock> {
    let mut merged: Vec<TextBlock> = Vec::with_capacity(blocks.len());
    let mut pending: Option<TextBlock> = None;

    for current in blocks {
        pending = Some(match pending {
            Some(mut open) if is_continuation_of(&open, &current) => {
                open.append_text(&current.text);
                open
            },
            Some(open) => {
                merged.push(open);
                current
            },
            None => current,
        });
    }
    merged.extend(pending);

    renumber(&mut merged);
    merged
}

fn is_continuation_of(pending: &TextBlock, current: &TextBlock) -> bool {
    match (pending.role, current.role) {
        (Some(p), Some(c)) => continues(p, c),
        _ => false,
    }
}
