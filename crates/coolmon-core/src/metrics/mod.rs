//! Rate Metrics
//!
//! Latest value, instantaneous rate and trailing-window statistics for one
//! numeric series. Rates are in units per minute. All values are returned at
//! full precision; rounding belongs to whoever displays them.

mod fit;

pub use fit::{least_squares_slope, population_std};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::fmt;

use crate::logbook::Series;

/// Trailing windows, in minutes, reported by [`summarize`]
pub const DEFAULT_WINDOWS: [f64; 3] = [1.0, 5.0, 10.0];

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Sign reported next to a magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    /// Zero or above
    Positive,
    /// Below zero
    Negative,
    /// The value is undefined
    Undefined,
}

impl Sign {
    /// Sign of `value`; NaN has no sign
    pub fn of(value: f64) -> Self {
        if value.is_nan() {
            Sign::Undefined
        } else if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// Display glyph: `+`, `-`, or nothing
    pub fn glyph(&self) -> &'static str {
        match self {
            Sign::Positive => "+",
            Sign::Negative => "-",
            Sign::Undefined => "",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A magnitude with its sign tracked separately
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignedValue {
    /// Sign of the value
    pub sign: Sign,
    /// Absolute value (NaN when undefined)
    pub magnitude: f64,
}

impl SignedValue {
    /// Split `value` into sign and absolute value
    pub fn new(value: f64) -> Self {
        Self {
            sign: Sign::of(value),
            magnitude: value.abs(),
        }
    }

    /// An undefined value: NaN magnitude, no sign
    pub fn undefined() -> Self {
        Self {
            sign: Sign::Undefined,
            magnitude: f64::NAN,
        }
    }

    /// Whether the value is defined
    pub fn is_defined(&self) -> bool {
        self.sign != Sign::Undefined
    }

    /// Recombine into a signed number (NaN when undefined)
    pub fn value(&self) -> f64 {
        match self.sign {
            Sign::Positive => self.magnitude,
            Sign::Negative => -self.magnitude,
            Sign::Undefined => f64::NAN,
        }
    }
}

/// Rate and spread over one trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStat {
    /// Sign of the fitted slope
    pub sign: Sign,
    /// Absolute fitted slope, per minute
    pub magnitude: f64,
    /// Population standard deviation of the values in the window
    pub stddev: f64,
}

impl WindowStat {
    /// Statistic for a window that holds too little data
    pub fn undefined() -> Self {
        Self {
            sign: Sign::Undefined,
            magnitude: f64::NAN,
            stddev: f64::NAN,
        }
    }

    /// Whether a rate could be fitted
    pub fn has_rate(&self) -> bool {
        self.sign != Sign::Undefined
    }

    /// Fitted slope with its sign applied
    pub fn rate(&self) -> f64 {
        SignedValue {
            sign: self.sign,
            magnitude: self.magnitude,
        }
        .value()
    }
}

/// A window statistic together with its window length
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowSummary {
    /// Window length in minutes
    pub minutes: f64,
    /// Statistic over that window
    pub stat: WindowStat,
}

/// Display metrics for one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Timestamp of the latest sample
    pub latest_at: NaiveDateTime,
    /// Latest value
    pub latest: SignedValue,
    /// Rate between the last two samples, per minute
    pub instantaneous_rate: SignedValue,
    /// One entry per requested window
    pub windows: Vec<WindowSummary>,
}

/// Summarize `series` over the [`DEFAULT_WINDOWS`].
///
/// Returns `None` for an empty series.
pub fn summarize(series: &Series<f64>) -> Option<Summary> {
    summarize_with_windows(series, &DEFAULT_WINDOWS)
}

/// Summarize `series` over custom windows (minutes)
pub fn summarize_with_windows(series: &Series<f64>, windows: &[f64]) -> Option<Summary> {
    let latest = series.last()?;

    Some(Summary {
        latest_at: latest.timestamp,
        latest: SignedValue::new(latest.value),
        instantaneous_rate: instantaneous_rate(series),
        windows: windows
            .iter()
            .map(|&minutes| WindowSummary {
                minutes,
                stat: window_stat(series, minutes),
            })
            .collect(),
    })
}

/// Rate between the last two samples, per minute.
///
/// Undefined with fewer than two samples or when both share a timestamp.
pub fn instantaneous_rate(series: &Series<f64>) -> SignedValue {
    let [.., previous, last] = series.samples() else {
        return SignedValue::undefined();
    };

    let minutes = minutes_between(previous.timestamp, last.timestamp);
    if minutes == 0.0 {
        return SignedValue::undefined();
    }

    let rate = (last.value - previous.value) / minutes;
    if rate.is_finite() {
        SignedValue::new(rate)
    } else {
        SignedValue::undefined()
    }
}

/// Fitted rate and spread over the trailing `window_minutes` of `series`.
///
/// The window ends at the latest sample. It is only evaluated when at least
/// one sample falls strictly before the window start, i.e. the series holds
/// more history than the window; otherwise the result is undefined. Samples
/// at or after the window start are fitted by least squares against elapsed
/// minutes. If the slope cannot be fitted (a single distinct timestamp) the
/// rate is undefined but the spread is still reported.
pub fn window_stat(series: &Series<f64>, window_minutes: f64) -> WindowStat {
    let Some(latest) = series.last() else {
        return WindowStat::undefined();
    };
    let Some(start) = window_start(latest.timestamp, window_minutes) else {
        return WindowStat::undefined();
    };

    if !series.iter().any(|s| s.timestamp < start) {
        return WindowStat::undefined();
    }

    let retained: Vec<_> = series.iter().filter(|s| s.timestamp >= start).collect();
    let Some(origin) = retained.first().map(|s| s.timestamp) else {
        return WindowStat::undefined();
    };
    let xs: Vec<f64> = retained
        .iter()
        .map(|s| minutes_between(origin, s.timestamp))
        .collect();
    let ys: Vec<f64> = retained.iter().map(|s| s.value).collect();

    let stddev = population_std(&ys);
    match least_squares_slope(&xs, &ys) {
        Some(slope) => WindowStat {
            sign: Sign::of(slope),
            magnitude: slope.abs(),
            stddev,
        },
        None => WindowStat {
            stddev,
            ..WindowStat::undefined()
        },
    }
}

/// Start of a window of `window_minutes` ending at `latest`.
///
/// `None` for negative or non-finite windows.
fn window_start(latest: NaiveDateTime, window_minutes: f64) -> Option<NaiveDateTime> {
    let millis = window_minutes * MILLIS_PER_MINUTE;
    if !millis.is_finite() || millis < 0.0 {
        return None;
    }
    let span = TimeDelta::try_milliseconds(millis.round() as i64)?;
    latest.checked_sub_signed(span)
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_MINUTE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 13)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
            + TimeDelta::seconds(seconds)
    }

    fn series(points: &[(i64, f64)]) -> Series<f64> {
        points.iter().map(|&(s, v)| (at(s), v)).collect()
    }

    #[test]
    fn test_sign_glyphs() {
        assert_eq!(Sign::of(0.0).glyph(), "+");
        assert_eq!(Sign::of(-0.1).glyph(), "-");
        assert_eq!(Sign::of(f64::NAN).glyph(), "");
        assert_eq!(SignedValue::new(-3.5).value(), -3.5);
    }

    #[test]
    fn test_instantaneous_rate() {
        let s = series(&[(0, 10.0), (30, 9.0)]);
        let rate = instantaneous_rate(&s);
        assert_eq!(rate.sign, Sign::Negative);
        assert!((rate.magnitude - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_instantaneous_rate_duplicate_timestamp() {
        let s = series(&[(0, 10.0), (0, 11.0)]);
        assert!(!instantaneous_rate(&s).is_defined());
    }

    #[test]
    fn test_window_needs_history_before_start() {
        let s = series(&[(0, 10.0), (30, 10.5), (60, 11.0)]);
        // The first sample sits exactly on the window start
        assert!(!window_stat(&s, 1.0).has_rate());
        assert!(!window_stat(&s, 10.0).has_rate());
        assert!(window_stat(&s, 10.0).stddev.is_nan());
    }

    #[test]
    fn test_window_fit() {
        let s = series(&[(-30, 0.0), (0, 10.0), (30, 10.5), (60, 11.0)]);
        let stat = window_stat(&s, 1.0);
        assert_eq!(stat.sign, Sign::Positive);
        assert!((stat.magnitude - 1.0).abs() < 1e-9);
        let expected_std = (1.0f64 / 6.0).sqrt();
        assert!((stat.stddev - expected_std).abs() < 1e-12);
    }

    #[test]
    fn test_window_single_retained_sample() {
        let s = series(&[(0, 5.0), (600, 4.0)]);
        let stat = window_stat(&s, 1.0);
        assert!(!stat.has_rate());
        assert_eq!(stat.stddev, 0.0);
    }

    #[test]
    fn test_negative_window_is_undefined() {
        let s = series(&[(0, 1.0), (30, 2.0)]);
        let stat = window_stat(&s, -1.0);
        assert!(!stat.has_rate());
        assert!(stat.stddev.is_nan());

        let summary = summarize_with_windows(&s, &[-0.5, f64::NAN]).unwrap();
        assert!(summary.windows.iter().all(|w| !w.stat.has_rate()));
        assert!(summary.instantaneous_rate.is_defined());
    }

    #[test]
    fn test_summarize_empty_and_single() {
        assert!(summarize(&Series::new()).is_none());

        let summary = summarize(&series(&[(0, -195.8)])).unwrap();
        assert_eq!(summary.latest.sign, Sign::Negative);
        assert_eq!(summary.latest.magnitude, 195.8);
        assert!(!summary.instantaneous_rate.is_defined());
        assert_eq!(summary.windows.len(), DEFAULT_WINDOWS.len());
        assert!(summary.windows.iter().all(|w| !w.stat.has_rate()));
    }
}
