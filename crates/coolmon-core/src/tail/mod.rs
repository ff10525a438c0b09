//! Log Tailing
//!
//! Reads the trailing block of a growing log file and splits it into lines.
//!
//! The file is opened, read and closed within a single call, so a logger can
//! keep appending to it between polls.

mod error;
mod lines;
mod reader;

pub use error::TailError;
pub use lines::{split_lines, Lines};
pub use reader::read_tail;

/// Block size that means "read the whole file"
pub const WHOLE_FILE: i64 = 0;

/// Block size used by the render loop when none is configured.
///
/// About 12,500 bytes holds roughly ten minutes of status polling at one
/// sample per second; the default still reads the whole file.
pub const DEFAULT_BLOCK_SIZE: i64 = WHOLE_FILE;
