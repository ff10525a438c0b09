//! Log parser
//!
//! Turns record lines into typed series. Malformed lines are skipped one at a
//! time; a bad line never discards the rest of the batch.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::{
    Channel, LogRecord, Payload, Series, HEARTBEAT_TOKEN, RECORD_SEPARATOR, TIMESTAMP_FORMAT,
};

/// Minimum number of lines (banner included) worth parsing
const MIN_LINES: usize = 3;

/// Reasons a single record line is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    #[error("Expected exactly one record separator, found {0}")]
    BadSeparator(usize),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid {channel:?} value '{text}'")]
    InvalidValue { channel: Channel, text: String },
}

/// Series extracted from one block of log lines
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedLog {
    /// Channel T1 samples
    pub t1: Series<f64>,
    /// Channel S1 samples
    pub s1: Series<f64>,
    /// Channel C1 samples
    pub c1: Series<f64>,
    /// Channel T2 samples
    pub t2: Series<f64>,
    /// Everything that is neither a sample nor a heartbeat
    pub other: Series<String>,
    /// Number of data lines rejected as malformed
    pub skipped: usize,
}

impl ParsedLog {
    /// Get the series for a numeric channel
    pub fn channel(&self, channel: Channel) -> &Series<f64> {
        match channel {
            Channel::T1 => &self.t1,
            Channel::S1 => &self.s1,
            Channel::C1 => &self.c1,
            Channel::T2 => &self.t2,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut Series<f64> {
        match channel {
            Channel::T1 => &mut self.t1,
            Channel::S1 => &mut self.s1,
            Channel::C1 => &mut self.c1,
            Channel::T2 => &mut self.t2,
        }
    }

    /// Total samples across all five series
    pub fn sample_count(&self) -> usize {
        Channel::ALL
            .iter()
            .map(|c| self.channel(*c).len())
            .sum::<usize>()
            + self.other.len()
    }

    /// Check if every series is empty
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }
}

/// Parse a batch of log lines into series.
///
/// Fewer than three lines yields empty series. The first line is always
/// dropped: it is either the file banner or a line cut in half by the block
/// boundary. Output order follows input order.
pub fn parse<I>(lines: I) -> ParsedLog
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let lines: Vec<I::Item> = lines.into_iter().collect();
    let mut log = ParsedLog::default();
    if lines.len() < MIN_LINES {
        return log;
    }

    for line in lines.iter().skip(1) {
        let record = std::str::from_utf8(line.as_ref())
            .map_err(|_| RecordError::InvalidUtf8)
            .and_then(parse_record);

        match record {
            Ok(LogRecord {
                timestamp,
                payload: Payload::Sample { channel, value },
            }) => log.channel_mut(channel).push(timestamp, value),
            Ok(LogRecord {
                timestamp,
                payload: Payload::Other(text),
            }) => log.other.push(timestamp, text),
            Ok(LogRecord {
                payload: Payload::Heartbeat,
                ..
            }) => {}
            Err(_) => log.skipped += 1,
        }
    }

    log
}

/// Parse and classify a single record line
pub fn parse_record(line: &str) -> Result<LogRecord, RecordError> {
    let cleaned = line.replace(['[', '\n'], "");

    let fields: Vec<&str> = cleaned.split(RECORD_SEPARATOR).collect();
    let [stamp, payload] = fields.as_slice() else {
        return Err(RecordError::BadSeparator(fields.len() - 1));
    };

    let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|_| RecordError::InvalidTimestamp(stamp.to_string()))?;

    Ok(LogRecord {
        timestamp,
        payload: classify(payload)?,
    })
}

fn classify(payload: &str) -> Result<Payload, RecordError> {
    if payload == HEARTBEAT_TOKEN {
        return Ok(Payload::Heartbeat);
    }

    for channel in Channel::ALL {
        if let Some(text) = payload.strip_prefix(channel.prefix()) {
            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| RecordError::InvalidValue {
                    channel,
                    text: text.to_string(),
                })?;
            return Ok(Payload::Sample { channel, value });
        }
    }

    Ok(Payload::Other(payload.to_string()))
}
