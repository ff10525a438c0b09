//! Render frames
//!
//! Everything the render loop draws on one refresh, derived from the log file
//! alone. [`PlotState`] is owned by the render loop and changed only through
//! [`PlotState::apply`]; the tail, parse and metric functions never see it.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::logbook::{parse, Channel, ParsedLog, Sample};
use crate::metrics::{summarize, Summary};
use crate::tail::{read_tail, split_lines, TailError, DEFAULT_BLOCK_SIZE};

/// Degree Celsius sign
pub const CELSIUS: &str = "\u{2103}";

/// Degree Fahrenheit sign
pub const FAHRENHEIT: &str = "\u{2109}";

/// Channels drawn on the temperature axis
pub const PLOTTED_CHANNELS: [Channel; 3] = [Channel::T1, Channel::S1, Channel::C1];

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Render loop state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotState {
    running: bool,
    block_size: i64,
}

/// Events that change the render loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotEvent {
    /// The display was closed; stop rendering
    Closed,
    /// Use a different tail block size (0 or less reads the whole file)
    BlockSize(i64),
}

impl Default for PlotState {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl PlotState {
    /// Create a running state that tails `block_size` bytes
    pub fn new(block_size: i64) -> Self {
        Self {
            running: true,
            block_size,
        }
    }

    /// Apply an event
    pub fn apply(&mut self, event: PlotEvent) {
        match event {
            PlotEvent::Closed => self.running = false,
            PlotEvent::BlockSize(size) => self.block_size = size,
        }
    }

    /// Whether the render loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current tail block size
    pub fn block_size(&self) -> i64 {
        self.block_size
    }
}

/// Temperature axis limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLimits {
    /// Lower limit
    pub min: f64,
    /// Upper limit
    pub max: f64,
}

impl AxisLimits {
    /// Limits padded 5% away from the data.
    ///
    /// The padding moves each limit outward whatever its sign. NaN values are
    /// ignored; `None` when nothing is left.
    pub fn padded<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        Some(Self {
            min: if min >= 0.0 { min * 0.95 } else { min * 1.05 },
            max: if max >= 0.0 { max * 1.05 } else { max * 0.95 },
        })
    }

    /// The same limits in Fahrenheit
    pub fn fahrenheit(&self) -> Self {
        Self {
            min: celsius_to_fahrenheit(self.min),
            max: celsius_to_fahrenheit(self.max),
        }
    }
}

/// One refresh worth of display data
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Series parsed from the trailing block
    pub log: ParsedLog,
    /// T1 metrics, once T1 has at least two samples
    pub t1_summary: Option<Summary>,
    /// Temperature axis limits over the plotted channels
    pub limits: Option<AxisLimits>,
    /// First and last timestamp over the plotted channels
    pub span: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Frame {
    /// Derive display data from parsed series
    pub fn new(log: ParsedLog) -> Self {
        let limits = AxisLimits::padded(plotted_samples(&log).map(|s| s.value));
        let span = plotted_samples(&log).map(|s| s.timestamp).fold(
            None,
            |acc: Option<(NaiveDateTime, NaiveDateTime)>, t| match acc {
                None => Some((t, t)),
                Some((first, last)) => Some((first.min(t), last.max(t))),
            },
        );
        let t1_summary = if log.t1.len() > 1 {
            summarize(&log.t1)
        } else {
            None
        };

        Self {
            log,
            t1_summary,
            limits,
            span,
        }
    }

    /// Whether there is anything to draw
    pub fn has_data(&self) -> bool {
        self.limits.is_some()
    }
}

fn plotted_samples(log: &ParsedLog) -> impl Iterator<Item = &Sample<f64>> {
    PLOTTED_CHANNELS
        .into_iter()
        .flat_map(move |c| log.channel(c).iter())
}

/// Read the tail of the log at `path` and build a frame.
///
/// `Ok(None)` while the log does not exist yet.
pub fn poll_frame<P: AsRef<Path>>(path: P, block_size: i64) -> Result<Option<Frame>, TailError> {
    let block = match read_tail(path, block_size) {
        Ok(block) => block,
        Err(TailError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    let log = parse(split_lines(&block, false));
    Ok(Some(Frame::new(log)))
}

/// Five-line metric annotation, rounded to one decimal place
pub fn metric_report(summary: &Summary, unit: &str) -> String {
    let mut report = format!(
        "Current Temp: {}{:.1}{unit}\nInst. Rate: {}{:.1}{unit}/min",
        summary.latest.sign,
        summary.latest.magnitude,
        summary.instantaneous_rate.sign,
        summary.instantaneous_rate.magnitude,
    );

    for window in &summary.windows {
        let _ = write!(
            report,
            "\nRate & STD ({} min): {}{:.1}{unit}/min, {:.1}{unit}",
            window.minutes, window.stat.sign, window.stat.magnitude, window.stat.stddev,
        );
    }

    report
}
