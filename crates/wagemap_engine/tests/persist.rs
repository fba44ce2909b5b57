use std::fs;

use tempfile::TempDir;
use wagemap_engine::write_atomic;

#[test]
fn writes_and_replaces_atomically() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("cache.json");

    write_atomic(&target, b"{\"rates\":{}}").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "{\"rates\":{}}");

    write_atomic(&target, b"{}").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
}

#[test]
fn creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("out").join("data.csv");
    assert!(!target.parent().unwrap().exists());

    write_atomic(&target, b"header\n").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "header\n");
}

#[test]
fn fails_when_the_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let target = blocker.join("data.csv");
    assert!(write_atomic(&target, b"data").is_err());
}
