//! Property-Based Tests
//!
//! Invariants of the text and layout stages checked over generated inputs:
//! - Normalization is idempotent
//! - The quality gate is total
//! - Margin clusters cover every input value exactly once
//! - Renumbering and merging always yield contiguous orders
//! - Merging continuation chains is associative

use layout_oxide::extractors::PageBlocks;
use layout_oxide::layout::{
    cluster_values, merge_continuations, retain_min_chars, ParagraphClassifier, Role, TextBlock,
};
use layout_oxide::pipeline::concatenate_pages;
use layout_oxide::text::{assess_quality, normalize_text};
use proptest::prelude::*;

/// Text made mostly of characters the normalizer reacts to.
fn ocr_like_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "1", "5", "'", "!", "°", "?", "№", "No", "Ne ", "|", " ", "  ", "\n", "»", "‘", "I",
            "Б)", "а}", "OT ", "СТ.", "статья", "x",
        ]),
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![
        Role::CenteredStart,
        Role::CenteredContinuation,
        Role::LeftStart,
        Role::LeftContinuation,
        Role::RightStart,
        Role::RightContinuation,
    ])
}

fn blocks() -> impl Strategy<Value = Vec<TextBlock>> {
    prop::collection::vec(("[а-я]{0,6}", -50i64..700, -50i64..700, -100i64..400), 0..30).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (text, left, right, gap))| {
                    TextBlock::new(i + 1, text)
                        .with_offsets(left, right)
                        .with_gaps(gap, 0)
                })
                .collect()
        },
    )
}

fn is_contiguous(blocks: &[TextBlock]) -> bool {
    blocks.iter().enumerate().all(|(i, b)| b.order == i + 1)
}

// ============================================================================
// Text Properties
// ============================================================================

#[test]
fn proptest_normalize_idempotent_on_ocr_noise() {
    proptest!(|(text in ocr_like_text())| {
        let once = normalize_text(&text);
        prop_assert_eq!(normalize_text(&once), once);
    });
}

#[test]
fn proptest_normalize_idempotent_on_any_text() {
    proptest!(|(text in "\\PC{0,80}")| {
        let once = normalize_text(&text);
        prop_assert_eq!(normalize_text(&once), once);
    });
}

#[test]
fn proptest_quality_gate_is_total() {
    proptest!(|(text in "\\PC{0,60}")| {
        // Must return a verdict for every input.
        let _ = assess_quality(&text);
    });
}

// ============================================================================
// Layout Properties
// ============================================================================

#[test]
fn proptest_clusters_cover_every_value_once() {
    proptest!(|(values in prop::collection::vec(-1000i64..1000, 1..60), proximity in 0i64..50)| {
        let clusters = cluster_values(values.clone(), proximity);
        prop_assert_eq!(clusters.total_count(), values.len());

        for value in &values {
            let holders = clusters.bands().iter().filter(|b| b.contains(*value)).count();
            prop_assert_eq!(holders, 1);
        }

        let counts: Vec<usize> = clusters.bands().iter().map(|b| b.count).collect();
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    });
}

#[test]
fn proptest_first_block_is_centered_start() {
    proptest!(|(mut blocks in blocks())| {
        ParagraphClassifier::default().classify_document(&mut blocks);
        if let Some(first) = blocks.first() {
            prop_assert_eq!(first.role, Some(Role::CenteredStart));
        }
        prop_assert!(blocks.iter().all(|b| b.role.is_some() && b.emphasis.is_some()));
    });
}

#[test]
fn proptest_orders_contiguous_after_each_stage() {
    proptest!(|(blocks in blocks(), split in 0usize..30)| {
        let split = split.min(blocks.len());
        let (a, b) = blocks.split_at(split);
        let pages = vec![PageBlocks::new(1, a.to_vec()), PageBlocks::new(2, b.to_vec())];

        let document = concatenate_pages(pages, 10);
        prop_assert!(is_contiguous(&document));

        let mut filtered = retain_min_chars(document, 2);
        prop_assert!(is_contiguous(&filtered));

        ParagraphClassifier::default().classify_document(&mut filtered);
        let merged = merge_continuations(filtered);
        prop_assert!(is_contiguous(&merged));
    });
}

#[test]
fn proptest_merge_preserves_text() {
    proptest!(|(roles in prop::collection::vec(role(), 0..25))| {
        let blocks: Vec<TextBlock> = roles
            .iter()
            .enumerate()
            .map(|(i, r)| TextBlock::new(i + 1, format!("b{}", i)).with_role(*r))
            .collect();
        let expected: Vec<String> = blocks.iter().map(|b| b.text.clone()).collect();

        let merged = merge_continuations(blocks);
        let words: Vec<String> = merged
            .iter()
            .flat_map(|b| b.text.split(' ').map(str::to_string))
            .collect();
        prop_assert_eq!(words, expected);
        prop_assert!(merged.len() <= roles.len());
    });
}

#[test]
fn proptest_merge_associative_over_chains() {
    let chains = prop::sample::select(vec![
        (Role::LeftStart, Role::LeftContinuation),
        (Role::LeftContinuation, Role::LeftContinuation),
        (Role::CenteredStart, Role::CenteredContinuation),
        (Role::RightStart, Role::RightContinuation),
    ]);
    proptest!(|(chain in chains, a in "[а-я]{1,8}", b in "[а-я]{1,8}", c in "[а-я]{1,8}")| {
        let (head, tail) = chain;
        let block = |order: usize, text: &str, role: Role| TextBlock::new(order, text).with_role(role);

        // (A, B) first, then C.
        let ab = merge_continuations(vec![block(1, &a, head), block(2, &b, tail)]);
        let mut left_first = ab.clone();
        left_first.push(block(2, &c, tail));
        let left = merge_continuations(left_first);

        // (B, C) first, then A.
        let bc = merge_continuations(vec![block(1, &b, tail), block(2, &c, tail)]);
        let mut right_first = vec![block(1, &a, head)];
        right_first.extend(bc);
        let right = merge_continuations(right_first);

        prop_assert_eq!(left.len(), 1);
        prop_assert_eq!(right.len(), 1);
        prop_assert_eq!(&left[0].text, &right[0].text);
        prop_assert_eq!(left[0].text.clone(), format!("{} {} {}", a, b, c));
    });
}
