use crate::reporting::{Reporter, StreamReporter};
use crate::stat::Stat;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn file_stream_appends_one_line_per_stat() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.jsonl");
    fs::write(&path, "existing\n").unwrap();

    let mut reporter = StreamReporter::to_file(&path);
    reporter.start().await.unwrap();
    reporter.emit(&Stat::info("a", None)).await.unwrap();
    reporter.emit(&Stat::info("b", None)).await.unwrap();
    reporter.stop().await.unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "existing");
    let stat: Stat = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(stat, Stat::info("b", None));
}

#[tokio::test]
async fn file_is_not_created_before_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.jsonl");

    let mut reporter = StreamReporter::to_file(&path);
    reporter.emit(&Stat::info("ignored", None)).await.unwrap();

    assert!(!path.exists());
}

#[tokio::test]
async fn restart_reopens_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.jsonl");
    let mut reporter = StreamReporter::to_file(&path);

    for message in ["first run", "second run"] {
        reporter.start().await.unwrap();
        reporter.emit(&Stat::info(message, None)).await.unwrap();
        reporter.stop().await.unwrap();
    }

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn missing_directory_fails_to_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("stats.jsonl");

    let mut reporter = StreamReporter::to_file(&path);
    let err = reporter.start().await.unwrap_err();

    assert!(err.to_string().contains("stats.jsonl"), "{err}");
    assert!(!reporter.started());
}
