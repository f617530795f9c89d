//! The resolved away period.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

/// A concrete `(start, end)` pair.
///
/// `end >= start` is not guaranteed: "afk for -30 min" legitimately ends
/// before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Signed length of the range (negative when `end` precedes `start`).
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `true` for zero-length and negative-length ranges.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
