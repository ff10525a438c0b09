//! Logbook
//!
//! The cooling log file format: one banner line, then one timestamped record
//! per line:
//!
//! ```text
//! [2025-06-13_11-30-43]  ptc
//! [2025-06-13_11-30-43]  T1 -12.5
//! [2025-06-13_11-30-44]  operator command
//! ```

mod parser;
mod series;
mod writer;

pub use parser::{parse, parse_record, ParsedLog, RecordError};
pub use series::{Sample, Series};
pub use writer::{default_log_path, format_record, LogWriter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fixed-width timestamp format used in record lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Separator between the bracketed timestamp and the payload
pub const RECORD_SEPARATOR: &str = "]  ";

/// Payload written for every status poll; carries no data
pub const HEARTBEAT_TOKEN: &str = "ptc";

/// Numeric channels reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Stage temperature
    T1,
    /// Shield temperature
    S1,
    /// Cold head temperature
    C1,
    /// Secondary stage temperature; logged but not plotted
    T2,
}

impl Channel {
    /// All numeric channels in log order
    pub const ALL: [Channel; 4] = [Channel::T1, Channel::S1, Channel::C1, Channel::T2];

    /// Payload prefix that marks a sample of this channel
    pub fn prefix(&self) -> &'static str {
        match self {
            Channel::T1 => "T1 ",
            Channel::S1 => "S1 ",
            Channel::C1 => "C1 ",
            Channel::T2 => "T2 ",
        }
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        self.prefix().trim_end()
    }
}

/// Classified payload of one record
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A numeric channel sample
    Sample { channel: Channel, value: f64 },
    /// Status poll heartbeat
    Heartbeat,
    /// Anything else: operator commands and free-form annotations
    Other(String),
}

/// A single parsed record line
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// When the record was written
    pub timestamp: NaiveDateTime,
    /// What the record says
    pub payload: Payload,
}
