use chrono::{TimeZone, Utc};
use skugeo_core::{AiTags, PriceValue, Product};

use super::*;

fn product(identity: &str, keyword: &str) -> Product {
    Product {
        identity: identity.to_owned(),
        name: format!("商品 {identity}"),
        price: PriceValue::Text("299.00".to_owned()),
        source_keyword: keyword.to_owned(),
        ..Product::default()
    }
}

fn sample_batch() -> Batch {
    let mut tagged = product("B2", "针织");
    tagged.ai_tags = Some(AiTags {
        main_category: "针织衫".to_owned(),
        ..AiTags::default()
    });
    Batch::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap(),
        vec![product("A1", "外套"), tagged],
    )
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn save_then_load_returns_same_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonBatchStore::new(dir.path().join("batch.json"));
    let batch = sample_batch();

    let written = store.save(&batch).await.expect("save");
    assert_eq!(written, dir.path().join("batch.json"));

    let loaded = store.load().await.expect("load");
    assert_eq!(loaded, batch);
    assert_eq!(loaded.count(), 2);
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("output").join("nested").join("batch.json");
    let store = JsonBatchStore::new(&target);

    store.save(&sample_batch()).await.expect("save");
    assert!(target.is_file());
}

#[tokio::test]
async fn save_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonBatchStore::new(dir.path().join("batch.json"));

    store.save(&sample_batch()).await.expect("first save");
    store.save(&sample_batch()).await.expect("second save");

    assert_eq!(dir_entries(dir.path()), vec!["batch.json"]);
}

#[tokio::test]
async fn save_writes_readable_utf8_with_batch_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonBatchStore::new(dir.path().join("batch.json"));
    store.save(&sample_batch()).await.expect("save");

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("外套"), "non-ASCII must not be escaped: {text}");
    assert!(text.contains('\n'), "output should be pretty-printed");

    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["total_count"], 2);
    assert_eq!(doc["products"].as_array().map(Vec::len), Some(2));
    assert!(doc["fetchedAt"].is_string());
}

#[tokio::test]
async fn save_replaces_previous_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonBatchStore::new(dir.path().join("batch.json"));

    store.save(&sample_batch()).await.expect("first save");
    let smaller = Batch::new(Utc::now(), vec![product("C3", "连衣裙")]);
    store.save(&smaller).await.expect("second save");

    let loaded = store.load().await.expect("load");
    assert_eq!(loaded.count(), 1);
    assert_eq!(loaded.products()[0].identity, "C3");
}

#[tokio::test]
async fn empty_batch_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonBatchStore::new(dir.path().join("batch.json"));
    let empty = Batch::new(Utc::now(), Vec::new());

    store.save(&empty).await.expect("save");
    let loaded = store.load().await.expect("load");
    assert_eq!(loaded.count(), 0);
    assert!(loaded.products().is_empty());
}

#[tokio::test]
async fn failed_save_reports_io_error_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the target path makes the final rename fail.
    let target = dir.path().join("batch.json");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep.txt"), "previous").unwrap();

    let err = JsonBatchStore::new(&target)
        .save(&sample_batch())
        .await
        .expect_err("rename over a directory must fail");

    assert!(matches!(err, StoreError::Io { .. }), "got: {err:?}");
    assert_eq!(dir_entries(dir.path()), vec!["batch.json"]);
    assert_eq!(
        std::fs::read_to_string(target.join("keep.txt")).unwrap(),
        "previous"
    );
}

#[tokio::test]
async fn save_fails_when_parent_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("output");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = JsonBatchStore::new(blocker.join("batch.json"))
        .save(&sample_batch())
        .await
        .expect_err("parent is a file");
    assert!(matches!(err, StoreError::Io { .. }), "got: {err:?}");
}

#[tokio::test]
async fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonBatchStore::new(dir.path().join("absent.json"))
        .load()
        .await
        .expect_err("missing file");
    assert!(matches!(err, StoreError::Io { .. }), "got: {err:?}");
}

#[tokio::test]
async fn load_rejects_non_batch_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.json");
    std::fs::write(&path, r#"{"products": "nope"}"#).unwrap();

    let err = JsonBatchStore::new(&path)
        .load()
        .await
        .expect_err("malformed batch");
    assert!(matches!(err, StoreError::Decode { .. }), "got: {err:?}");
}
