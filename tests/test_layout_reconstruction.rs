//! Integration tests for document reconstruction: concatenation,
//! classification and continuation merging over the public API.

use layout_oxide::extractors::PageBlocks;
use layout_oxide::layout::{
    cluster_values, merge_continuations, Alignment, ColorSample, ParagraphClassifier, Role,
    TextBlock,
};
use layout_oxide::pipeline::{concatenate_pages, reconstruct_document};
use layout_oxide::LayoutConfig;

// Helper functions for building blocks

fn line(text: &str, left: i64, right: i64, gap_before: i64) -> TextBlock {
    TextBlock::new(1, text)
        .with_offsets(left, right)
        .with_gaps(gap_before, 0)
}

fn page(index: usize, blocks: Vec<TextBlock>) -> PageBlocks {
    let mut blocks = blocks;
    for (i, block) in blocks.iter_mut().enumerate() {
        block.order = i + 1;
    }
    PageBlocks::new(index, blocks)
}

#[test]
fn test_left_start_and_continuation_merge() {
    let blocks = vec![
        TextBlock::new(1, "Пункт 1.").with_role(Role::LeftStart),
        TextBlock::new(2, "продолжение текста").with_role(Role::LeftContinuation),
    ];

    let merged = merge_continuations(blocks);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text, "Пункт 1. продолжение текста");
    let orders: Vec<usize> = merged.iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![1]);
}

#[test]
fn test_two_pages_concatenate_with_page_break_gap() {
    let pages = vec![
        page(1, vec![line("Первая строка", 50, 40, 120), line("Вторая строка", 50, 40, 8)]),
        page(2, vec![line("Третья строка", 50, 40, 640)]),
    ];

    let document = concatenate_pages(pages, LayoutConfig::default().page_break_gap);
    let orders: Vec<usize> = document.iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(document[2].gap_before, 10);
    assert_eq!(document[0].gap_before, 120);
}

#[test]
fn test_margin_clusters_ranked_by_count() {
    let clusters = cluster_values(vec![50, 52, 55, 200, 600, 605], 20);
    assert_eq!(
        clusters.labelled(),
        vec![
            ("50-55".to_string(), 3),
            ("600-605".to_string(), 2),
            ("200".to_string(), 1),
        ]
    );
}

#[test]
fn test_contract_page_reconstruction() {
    // Title, a right-aligned date, then two paragraphs on the body margin
    // with a hanging second line each.
    let mut title = line("ДОГОВОР ПОСТАВКИ", 210, 205, 60);
    title.color_sample = ColorSample::new(40, 40, 40);
    let blocks = vec![
        title,
        line("г. Москва 1 марта", 420, 40, 40),
        line("1. Поставщик обязуется передать товар", 90, 40, 40),
        line("в собственность Покупателя.", 50, 60, 8),
        line("2. Покупатель обязуется оплатить товар", 90, 40, 30),
        line("в установленный срок.", 50, 300, 9),
        line("по договору в целом.", 50, 310, 7),
    ];
    let blocks: Vec<TextBlock> = blocks
        .into_iter()
        .enumerate()
        .map(|(i, mut b)| {
            b.order = i + 1;
            b
        })
        .collect();

    let paragraphs = reconstruct_document(blocks, &LayoutConfig::default());

    let summary: Vec<(Role, &str)> = paragraphs
        .iter()
        .map(|p| (p.role, p.text.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Role::CenteredStart, "ДОГОВОР ПОСТАВКИ"),
            (Role::RightStart, "г. Москва 1 марта"),
            (Role::LeftStart, "1. Поставщик обязуется передать товар в собственность Покупателя."),
            (
                Role::LeftStart,
                "2. Покупатель обязуется оплатить товар в установленный срок. по договору в целом."
            ),
        ]
    );
    assert!(paragraphs[0].emphasis);
    assert!(!paragraphs[2].emphasis);
    assert_eq!(paragraphs[0].alignment(), Alignment::Center);
    assert_eq!(paragraphs[2].alignment(), Alignment::Justify);
    let orders: Vec<usize> = paragraphs.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);
}

#[test]
fn test_first_block_is_centered_start_whatever_its_geometry() {
    let mut blocks = vec![line("Правый край", 400, 10, 0), line("Текст", 50, 40, 5)];
    ParagraphClassifier::default().classify_document(&mut blocks);
    assert_eq!(blocks[0].role, Some(Role::CenteredStart));
}

#[test]
fn test_single_character_blocks_dropped_before_classification() {
    let blocks = vec![
        line("Заголовок", 100, 100, 20),
        line("-", 50, 40, 5),
        line("Основной текст", 50, 40, 5),
    ];
    let paragraphs = reconstruct_document(blocks, &LayoutConfig::default());
    assert!(paragraphs.iter().all(|p| p.text != "-"));
    assert_eq!(paragraphs.last().map(|p| p.order), Some(paragraphs.len()));
}

#[test]
fn test_empty_document() {
    assert!(reconstruct_document(Vec::new(), &LayoutConfig::default()).is_empty());
}
