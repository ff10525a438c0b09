//! # coolmon Core Library
//!
//! Core functionality for the coolmon cooling-controller monitor.

#![warn(missing_docs)]

//!
//! This library provides:
//! - Backwards tailing of a growing log file in fixed-size blocks
//! - Parsing of timestamped log records into typed channel series
//! - Instantaneous and windowed rate / spread statistics
//! - The plain-text TCP link to the cooling controller
//! - A simulated controller for running without hardware
//!
//! ## Example
//!
//! ```rust,ignore
//! use coolmon_core::{logbook, metrics, tail};
//!
//! let block = tail::read_tail("log/log_cooling.log", 12_500)?;
//! let log = logbook::parse(tail::split_lines(&block, false));
//! if let Some(summary) = metrics::summarize(&log.t1) {
//!     println!("T1 now {}{}", summary.latest.sign, summary.latest.magnitude);
//! }
//! ```

pub mod config;
pub mod controller;
pub mod demo;
pub mod logbook;
pub mod metrics;
pub mod tail;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::MonitorConfig;
    pub use crate::controller::{ControllerConfig, ControllerError, ControllerLink};
    pub use crate::logbook::{parse, Channel, LogWriter, ParsedLog, Series};
    pub use crate::metrics::{summarize, window_stat, Sign, Summary, WindowStat};
    pub use crate::tail::{read_tail, split_lines, TailError};
    pub use crate::view::{poll_frame, Frame, PlotEvent, PlotState};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
