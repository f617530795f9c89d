//! # afk-engine
//!
//! Deterministic resolution of away phrases into time ranges.
//!
//! Given a short phrase like "afk for 2 hours", "afk from 5pm" or "will
//! start late by 1pm on monday", a reference "now" and a fixed UTC offset,
//! the engine produces a concrete `(start, end)` pair. Nothing here reads
//! the system clock; the caller always supplies the anchor.
//!
//! ## Modules
//!
//! - [`resolver`] — the resolution policy: matches → [`TimeRange`]
//! - [`english`] — built-in rule-based English [`Extractor`]
//! - [`extract`] — the [`Extractor`] trait and [`ParsedMatch`]
//! - [`accuracy`] — ordered precision tiers
//! - [`relative`] — calendar-correct month/year offsets
//! - [`day`] — start/end of calendar day
//! - [`range`] — the [`TimeRange`] result
//! - [`offset`] — fixed UTC offset parsing
//! - [`error`] — Error types

pub mod accuracy;
pub mod day;
pub mod english;
pub mod error;
pub mod extract;
pub mod offset;
pub mod range;
pub mod relative;
pub mod resolver;

pub use accuracy::Accuracy;
pub use day::{end_of_day, start_of_day};
pub use english::EnglishExtractor;
pub use error::{AfkError, Result};
pub use extract::{Extractor, ParsedMatch};
pub use offset::{fixed_offset, parse_utc_offset};
pub use range::TimeRange;
pub use relative::RelativeOffset;
pub use resolver::{resolve, resolve_matches, resolve_with};
