mod support;

use std::fs;

use rides_core::run::resolve_start;
use rides_export::{load_watermark, store_watermark, StateError};
use support::date;
use tempfile::TempDir;

#[test]
fn watermark_resumes_on_following_day() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".uberides.env");
    fs::write(&path, "LAST_DATE=2024-01-05\n").unwrap();

    let last = load_watermark(&path).unwrap();
    assert_eq!(last, Some(date(2024, 1, 5)));
    assert_eq!(resolve_start(last, date(2024, 1, 31), 365).unwrap(), date(2024, 1, 6));
}

#[test]
fn missing_file_means_no_watermark() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load_watermark(&dir.path().join("absent.env")).unwrap(), None);
}

#[test]
fn malformed_date_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.env");
    fs::write(&path, "LAST_DATE=01/05/2024\n").unwrap();
    match load_watermark(&path) {
        Err(StateError::MalformedDate { value, .. }) => assert_eq!(value, "01/05/2024"),
        other => panic!("expected malformed date, got {other:?}"),
    }
}

#[test]
fn store_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.env");
    fs::write(&path, "# owner: data-eng\nREGION=us\nLAST_DATE=2024-01-05\n").unwrap();

    store_watermark(&path, date(2024, 1, 9)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "REGION=us\nLAST_DATE=2024-01-09\n");
    assert_eq!(load_watermark(&path).unwrap(), Some(date(2024, 1, 9)));
}

#[test]
fn store_creates_file_when_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.env");
    store_watermark(&path, date(2024, 2, 29)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "LAST_DATE=2024-02-29\n");
}
