//! Tests for log file setup.

use super::*;
use serial_test::serial;
use std::fs;

#[test]
fn split_log_path_separates_directory_and_file() {
    let (dir, file) = split_log_path(Path::new("/var/log/pagesel/run.log")).unwrap();
    assert_eq!(dir, PathBuf::from("/var/log/pagesel"));
    assert_eq!(file, "run.log");
}

#[test]
fn split_log_path_bare_name_uses_current_directory() {
    let (dir, file) = split_log_path(Path::new("pagesel.log")).unwrap();
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(file, "pagesel.log");
}

#[test]
fn split_log_path_rejects_root() {
    assert!(matches!(
        split_log_path(Path::new("/")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
#[serial(tracing_init)]
fn init_creates_missing_log_directory() {
    let test_dir = std::env::temp_dir().join("pagesel_test_logs_create");
    let log_file = test_dir.join("nested").join("test.log");
    let _ = fs::remove_dir_all(&test_dir);

    // Subscriber may already be set by another test; the directory is created first.
    let _ = init(&log_file);

    assert!(
        log_file.parent().is_some_and(Path::exists),
        "Log directory should be created: {:?}",
        log_file
    );

    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn second_init_reports_subscriber_already_set() {
    let test_dir = std::env::temp_dir().join("pagesel_test_logs_twice");
    let log_file = test_dir.join("twice.log");

    let _ = init(&log_file);
    let second = init(&log_file);

    assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));

    let _ = fs::remove_dir_all(&test_dir);
}
