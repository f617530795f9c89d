//! Precision tiers attached to every extracted match.
//!
//! The tier names the coarsest calendar unit the extractor is confident
//! about. Tiers are totally ordered from coarsest to finest, and the
//! resolver only ever asks "at or coarser than" / "at or finer than" a
//! single named tier.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AfkError;

/// How precisely an extracted instant was resolved, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    Year,
    Month,
    Week,
    Day,
    HalfDay,
    Hour,
    Minute,
    Second,
    Now,
}

impl Accuracy {
    /// All tiers, coarsest to finest.
    pub const ALL: [Accuracy; 9] = [
        Accuracy::Year,
        Accuracy::Month,
        Accuracy::Week,
        Accuracy::Day,
        Accuracy::HalfDay,
        Accuracy::Hour,
        Accuracy::Minute,
        Accuracy::Second,
        Accuracy::Now,
    ];

    /// `true` when `self` is `tier` or any coarser tier.
    pub fn is_at_or_coarser_than(self, tier: Accuracy) -> bool {
        self <= tier
    }

    /// `true` when `self` is `tier` or any finer tier.
    pub fn is_at_or_finer_than(self, tier: Accuracy) -> bool {
        self >= tier
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Accuracy::Year => "year",
            Accuracy::Month => "month",
            Accuracy::Week => "week",
            Accuracy::Day => "day",
            Accuracy::HalfDay => "halfday",
            Accuracy::Hour => "hour",
            Accuracy::Minute => "minute",
            Accuracy::Second => "second",
            Accuracy::Now => "now",
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accuracy {
    type Err = AfkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Accuracy::ALL
            .into_iter()
            .find(|tier| tier.as_str() == lower)
            .ok_or_else(|| AfkError::InvalidDatetime(format!("unknown accuracy tier '{s}'")))
    }
}
