//! Log writer
//!
//! Appends timestamped records to the cooling log.

use chrono::{Local, NaiveDateTime};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{RECORD_SEPARATOR, TIMESTAMP_FORMAT};

/// Directory that default log paths are placed in
const DEFAULT_LOG_DIR: &str = "log";

/// Format a record line (without the trailing newline)
pub fn format_record(timestamp: NaiveDateTime, payload: &str) -> String {
    format!(
        "[{}{}{}",
        timestamp.format(TIMESTAMP_FORMAT),
        RECORD_SEPARATOR,
        payload
    )
}

/// Default log path for a session started at `started`:
/// `log/log_cooling_<timestamp>.log`
pub fn default_log_path(started: NaiveDateTime) -> PathBuf {
    Path::new(DEFAULT_LOG_DIR).join(format!(
        "log_cooling_{}.log",
        started.format(TIMESTAMP_FORMAT)
    ))
}

/// Writer for one cooling log file
pub struct LogWriter {
    /// Open log file
    file: File,
    /// Where the log lives
    path: PathBuf,
    /// Number of records written (banner excluded)
    records: usize,
}

impl LogWriter {
    /// Create (or truncate) the log at `path` and write the banner line.
    ///
    /// Missing parent directories are created.
    pub fn create<P: AsRef<Path>>(path: P, banner: &str) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        writeln!(file, "{}", banner.trim_end())?;
        file.flush()?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            records: 0,
        })
    }

    /// Write `payload` stamped with the current local time.
    ///
    /// Returns the line as written, without the newline.
    pub fn record(&mut self, payload: &str) -> io::Result<String> {
        self.record_at(Local::now().naive_local(), payload)
    }

    /// Write `payload` stamped with `timestamp`
    pub fn record_at(&mut self, timestamp: NaiveDateTime, payload: &str) -> io::Result<String> {
        let line = format_record(timestamp, payload.trim_end_matches(['\r', '\n']));
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        self.records += 1;
        Ok(line)
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far
    pub fn record_count(&self) -> usize {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 13)
            .unwrap()
            .and_hms_opt(11, 30, 43)
            .unwrap()
    }

    #[test]
    fn test_format_record() {
        assert_eq!(format_record(stamp(), "ptc"), "[2025-06-13_11-30-43]  ptc");
    }

    #[test]
    fn test_default_log_path() {
        assert_eq!(
            default_log_path(stamp()),
            Path::new("log").join("log_cooling_2025-06-13_11-30-43.log")
        );
    }

    #[test]
    fn test_writer_banner_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cooling.log");

        let mut writer = LogWriter::create(&path, "coolmon log").unwrap();
        writer.record_at(stamp(), "T1 -1.5\r\n").unwrap();
        writer.record_at(stamp(), "ptc").unwrap();
        assert_eq!(writer.record_count(), 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "coolmon log\n[2025-06-13_11-30-43]  T1 -1.5\n[2025-06-13_11-30-43]  ptc\n"
        );
    }
}
