use coolmon_core::tail::{read_tail, split_lines, TailError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const LOG: &str = "coolmon log started\n\
[2025-06-13_11-30-40]  ptc\n\
[2025-06-13_11-30-40]  T1 -12.5\n\
[2025-06-13_11-30-40]  S1 -40.0\n\
\n\
[2025-06-13_11-30-45]  ptc\n\
[2025-06-13_11-30-45]  T1 -12.9\n\
[2025-06-13_11-30-46]  SET T1 -150\n";

fn write_log(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log_cooling.log");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn forward_lines(contents: &str) -> Vec<&[u8]> {
    split_lines(contents.as_bytes(), false).collect()
}

#[test]
fn test_backward_matches_forward_for_every_block_size() {
    let (_dir, path) = write_log(LOG);
    let forward = forward_lines(LOG);

    for block_size in 1..=LOG.len() as i64 {
        let block = read_tail(&path, block_size).unwrap();
        let mut backward: Vec<&[u8]> = split_lines(&block, true).collect();
        backward.reverse();

        let tail = &forward[forward.len() - backward.len()..];
        let Some((first, rest)) = backward.split_first() else {
            // Only a trailing newline was read
            assert_eq!(block, b"\n");
            continue;
        };

        // Everything after the first fragment is a whole line
        assert_eq!(rest, &tail[1..], "block size {}", block_size);
        // The first fragment may be cut by the block boundary
        assert!(
            tail[0].ends_with(first),
            "block size {}: {:?} is not a suffix of {:?}",
            block_size,
            String::from_utf8_lossy(first),
            String::from_utf8_lossy(tail[0])
        );
    }
}

#[test]
fn test_boundary_on_newline_yields_whole_lines() {
    let (_dir, path) = write_log(LOG);
    let last_two = "[2025-06-13_11-30-45]  T1 -12.9\n[2025-06-13_11-30-46]  SET T1 -150\n";

    // Block starts right after a newline
    let block = read_tail(&path, last_two.len() as i64).unwrap();
    let lines: Vec<&[u8]> = split_lines(&block, false).collect();
    assert_eq!(
        lines,
        vec![
            b"[2025-06-13_11-30-45]  T1 -12.9".as_slice(),
            b"[2025-06-13_11-30-46]  SET T1 -150".as_slice(),
        ]
    );

    // Block starts on the newline itself
    let block = read_tail(&path, last_two.len() as i64 + 1).unwrap();
    assert_eq!(block[0], b'\n');
    assert_eq!(split_lines(&block, false).collect::<Vec<_>>(), lines);
}

#[test]
fn test_repeated_reads_are_identical() {
    let (_dir, path) = write_log(LOG);
    for block_size in [0, 7, 64, 10_000] {
        assert_eq!(
            read_tail(&path, block_size).unwrap(),
            read_tail(&path, block_size).unwrap()
        );
    }
}

#[test]
fn test_whole_file_fallback() {
    let (_dir, path) = write_log(LOG);
    for block_size in [0, -1, -12_500, LOG.len() as i64, LOG.len() as i64 + 1, i64::MAX] {
        assert_eq!(read_tail(&path, block_size).unwrap(), LOG.as_bytes());
    }
}

#[test]
fn test_tail_follows_growth() {
    let (_dir, path) = write_log(LOG);
    let before = read_tail(&path, 12).unwrap();

    let mut grown = LOG.to_string();
    grown.push_str("[2025-06-13_11-30-50]  T1 -13.1\n");
    fs::write(&path, &grown).unwrap();

    let after = read_tail(&path, 12).unwrap();
    assert_ne!(before, after);
    assert_eq!(after, &grown.as_bytes()[grown.len() - 12..]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_tail(dir.path().join("nope.log"), 0).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, TailError::NotFound(_)));
}

#[test]
fn test_empty_file() {
    let (_dir, path) = write_log("");
    let block = read_tail(&path, 100).unwrap();
    assert!(block.is_empty());
    assert_eq!(split_lines(&block, true).len(), 0);
}
