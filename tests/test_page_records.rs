//! Integration tests for the on-disk page record store.

use std::fs;

use layout_oxide::extractors::PageBlocks;
use layout_oxide::layout::{ColorSample, TextBlock};
use layout_oxide::pipeline::{PageRecordStore, RunWorkspace, CONCATENATED_FILE};
use layout_oxide::Error;

fn page(index: usize, texts: &[&str]) -> PageBlocks {
    let blocks = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            TextBlock::new(i + 1, *text)
                .with_offsets(50, 40)
                .with_gaps(200 + i as i64, 12)
                .with_color(ColorSample::new(90, 90, 90))
        })
        .collect();
    PageBlocks::new(index, blocks)
}

#[test]
fn test_save_and_concatenate_in_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageRecordStore::new(dir.path());

    // Saved out of order; page 10 must follow page 2.
    store.save(&page(10, &["десятая страница"])).unwrap();
    store.save(&page(2, &["вторая страница", "ещё строка"])).unwrap();
    store.save(&page(1, &["первая страница"])).unwrap();

    let document = store.concatenate(10).unwrap();
    let texts: Vec<&str> = document.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["первая страница", "вторая страница", "ещё строка", "десятая страница"]
    );
    let orders: Vec<usize> = document.iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);

    // First block of each later page has the page-break gap.
    assert_eq!(document[0].gap_before, 200);
    assert_eq!(document[1].gap_before, 10);
    assert_eq!(document[2].gap_before, 201);
    assert_eq!(document[3].gap_before, 10);
    assert_eq!(document[3].color_sample, ColorSample::new(90, 90, 90));
}

#[test]
fn test_unindexed_records_sort_last() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageRecordStore::new(dir.path());
    store.save(&page(3, &["третья"])).unwrap();
    let extra = serde_json::to_string(&vec![TextBlock::new(1, "приложение")]).unwrap();
    fs::write(dir.path().join("appendix.json"), extra).unwrap();
    store.save(&page(1, &["первая"])).unwrap();

    let pages = store.load_all().unwrap();
    let indices: Vec<usize> = pages.iter().map(|p| p.page_index).collect();
    assert_eq!(indices, vec![1, 3, 4]);
    assert_eq!(pages[2].blocks[0].text, "приложение");
}

#[test]
fn test_corrupt_record_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageRecordStore::new(dir.path());
    store.save(&page(1, &["первая"])).unwrap();
    fs::write(dir.path().join("processed_page_2.json"), "{ not json").unwrap();
    store.save(&page(3, &["третья"])).unwrap();

    let document = store.concatenate(10).unwrap();
    let texts: Vec<&str> = document.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["первая", "третья"]);
}

#[test]
fn test_decode_failure_reported_for_single_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed_page_1.json");
    fs::write(&path, "[{\"order\": 1}]").unwrap();

    let err = PageRecordStore::load_blocks(&path).unwrap_err();
    assert!(matches!(err, Error::DecodeFailure { .. }));
    assert!(err.is_unit_level());
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageRecordStore::new(dir.path().join("does_not_exist"));
    assert!(matches!(store.concatenate(10), Err(Error::InputNotFound(_))));
}

#[test]
fn test_directory_without_records() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();
    let store = PageRecordStore::new(dir.path());
    assert!(matches!(store.concatenate(10), Err(Error::NoInputUnits(_))));
}

#[test]
fn test_only_unreadable_records() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("processed_page_1.json"), "garbage").unwrap();
    let store = PageRecordStore::new(dir.path());
    assert!(matches!(store.load_all(), Err(Error::NoInputUnits(_))));
}

#[test]
fn test_concatenated_document_is_not_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageRecordStore::new(dir.path());
    store.save(&page(1, &["первая"])).unwrap();

    let document = store.concatenate(10).unwrap();
    let written = store.write_concatenated(&document).unwrap();
    assert!(written.ends_with(CONCATENATED_FILE));

    let again = store.concatenate(10).unwrap();
    assert_eq!(again, document);
}

#[test]
fn test_workspace_record_store() {
    let base = tempfile::tempdir().unwrap();
    let run = RunWorkspace::create_next(base.path()).unwrap();
    let store = run.record_store();
    let path = store.save(&page(5, &["пятая"])).unwrap();

    assert!(path.starts_with(run.records_dir()));
    assert!(path.ends_with("processed_page_5.json"));
    assert_eq!(store.load_all().unwrap()[0].page_index, 5);
}
