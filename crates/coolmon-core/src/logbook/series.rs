//! Time series extracted from the log

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single timestamped value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    /// Record timestamp
    pub timestamp: NaiveDateTime,
    /// Sample value
    pub value: T,
}

impl<T> Sample<T> {
    /// Create a new sample
    pub fn new(timestamp: NaiveDateTime, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Samples of one channel in file order.
///
/// Duplicate timestamps are kept as separate samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<T> {
    samples: Vec<Sample<T>>,
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<T> Series<T> {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample
    pub fn push(&mut self, timestamp: NaiveDateTime, value: T) {
        self.samples.push(Sample::new(timestamp, value));
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in order
    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    /// Iterate over samples
    pub fn iter(&self) -> impl Iterator<Item = &Sample<T>> {
        self.samples.iter()
    }

    /// First sample
    pub fn first(&self) -> Option<&Sample<T>> {
        self.samples.first()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&Sample<T>> {
        self.samples.last()
    }

    /// Timestamps only
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }
}

impl Series<f64> {
    /// Values only
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

impl<T> FromIterator<(NaiveDateTime, T)> for Series<T> {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, T)>>(iter: I) -> Self {
        Self {
            samples: iter
                .into_iter()
                .map(|(timestamp, value)| Sample::new(timestamp, value))
                .collect(),
        }
    }
}
