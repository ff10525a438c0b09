//! Block tailer
//!
//! Reads a fixed-size block from the end of a file.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use super::TailError;

/// Read the trailing `block_size` bytes of the file at `path`.
///
/// A `block_size` below 1, or larger than the current file size, reads the
/// whole file. The file size is taken at call time, so a file that shrank
/// since the previous call is simply read in full.
///
/// The file handle lives only for the duration of this call.
pub fn read_tail<P: AsRef<Path>>(path: P, block_size: i64) -> Result<Vec<u8>, TailError> {
    let path = path.as_ref();
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TailError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let size = file.metadata()?.len();
    let start = tail_offset(size, block_size);
    file.seek(SeekFrom::Start(start))?;

    let mut block = Vec::with_capacity((size - start) as usize);
    file.read_to_end(&mut block)?;
    Ok(block)
}

/// Byte offset to start reading from for a file of `size` bytes
fn tail_offset(size: u64, block_size: i64) -> u64 {
    match u64::try_from(block_size) {
        Ok(block) if block >= 1 && block <= size => size - block,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_offset() {
        assert_eq!(tail_offset(100, 10), 90);
        assert_eq!(tail_offset(100, 100), 0);
        assert_eq!(tail_offset(100, 101), 0);
        assert_eq!(tail_offset(100, 0), 0);
        assert_eq!(tail_offset(100, -5), 0);
        assert_eq!(tail_offset(0, 10), 0);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tail(dir.path().join("absent.log"), 10).unwrap_err();
        assert!(err.is_not_found());
    }
}
