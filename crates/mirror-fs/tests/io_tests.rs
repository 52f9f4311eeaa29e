use assert_fs::prelude::*;
use filetime::FileTime;
use mirror_fs::io;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_copy_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.txt");
    let dst = temp.path().join("dst.txt");
    fs::write(&src, "hello world").unwrap();

    io::copy_atomic(&src, &dst).unwrap();

    assert_eq!(fs::read_to_string(&dst).unwrap(), "hello world");
}

#[test]
fn test_copy_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.txt");
    let dst = temp.path().join("dst.txt");
    fs::write(&src, "updated").unwrap();
    fs::write(&dst, "original").unwrap();

    io::copy_atomic(&src, &dst).unwrap();

    assert_eq!(fs::read_to_string(&dst).unwrap(), "updated");
}

#[test]
fn test_copy_atomic_preserves_modification_time() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.txt");
    let dst = temp.path().join("dst.txt");
    fs::write(&src, "content").unwrap();
    let past = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&src, past).unwrap();

    io::copy_atomic(&src, &dst).unwrap();

    let copied = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
    assert_eq!(copied, past);
}

#[test]
fn test_copy_atomic_leaves_no_temp_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src.txt").write_str("content").unwrap();

    io::copy_atomic(temp.child("src.txt").path(), temp.child("dst.txt").path()).unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2, "unexpected entries: {names:?}");
    temp.child("dst.txt").assert(predicate::str::contains("content"));
}

#[test]
fn test_create_dir_all_creates_ancestors() {
    let temp = TempDir::new().unwrap();
    let deep = temp.path().join("a").join("b").join("c");

    io::create_dir_all(&deep).unwrap();

    assert!(deep.is_dir());
}

#[test]
fn test_remove_dir_all_removes_contents() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("old/nested/file.txt").write_str("x").unwrap();

    io::remove_dir_all(temp.child("old").path()).unwrap();

    temp.child("old").assert(predicate::path::missing());
}

#[test]
fn test_append_line_appends() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("sync_log.txt");

    io::append_line(&log, "first").unwrap();
    io::append_line(&log, "second").unwrap();

    assert_eq!(fs::read_to_string(&log).unwrap(), "first\nsecond\n");
}

#[test]
fn test_read_text_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "hello").unwrap();

    assert_eq!(io::read_text(&file_path).unwrap(), "hello");
}
