//! Phrase-to-range resolution.
//!
//! Turns the matches an [`Extractor`] found in a phrase into a concrete
//! [`TimeRange`]. Every recognized phrase yields a range, possibly a
//! degenerate one; the only failure is a phrase with no time expression
//! at all.
//!
//! # One match
//!
//! | Condition                                   | start                              | end                 |
//! |---------------------------------------------|------------------------------------|---------------------|
//! | phrase contains `after` / `from` / `post`   | match                              | end of start's day  |
//! | accuracy WEEK or coarser                    | reference                          | end of match's day  |
//! | accuracy DAY                                | max(reference, match's midnight)   | end of start's day  |
//! | accuracy HOUR, MINUTE or SECOND             | reference                          | match               |
//! | anything else (HALFDAY, NOW)                | reference                          | reference           |
//!
//! # Two or more matches
//!
//! Only the first two are consulted. The first is the start. The second is
//! the end, unless its accuracy is HALFDAY or finer: then its clock fields
//! are read as an elapsed length and added to the start ("from 4pm for
//! 1 hr").

use std::cmp::max;

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use tracing::{debug, info};

use crate::accuracy::Accuracy;
use crate::day::{end_of_day, start_of_day};
use crate::english::EnglishExtractor;
use crate::error::{AfkError, Result};
use crate::extract::{Extractor, ParsedMatch};
use crate::offset::fixed_offset;
use crate::range::TimeRange;

/// Words marking an open-ended start that lasts through the end of the day.
///
/// Matched as case-sensitive substrings of the raw phrase.
pub const DIRECTIONAL_KEYWORDS: [&str; 3] = ["after", "from", "post"];

/// Resolve `phrase` against `reference` shifted into a fixed UTC offset,
/// using the built-in [`EnglishExtractor`].
///
/// # Errors
///
/// Returns [`AfkError::InvalidOffset`] if `utc_offset_seconds` is beyond
/// ±1 day, [`AfkError::Unparseable`] if the phrase has no time expression.
///
/// # Examples
///
/// ```
/// use afk_engine::resolve;
/// use chrono::{DateTime, Utc};
///
/// let now: DateTime<Utc> = "2024-03-15T10:00:00Z".parse().unwrap();
/// let range = resolve("afk for 30 min", now, 0).unwrap();
/// assert_eq!(range.end.to_rfc3339(), "2024-03-15T10:30:00+00:00");
/// ```
pub fn resolve(phrase: &str, reference: DateTime<Utc>, utc_offset_seconds: i32) -> Result<TimeRange> {
    let offset = fixed_offset(utc_offset_seconds)?;
    resolve_with(&EnglishExtractor, phrase, &reference.with_timezone(&offset))
}

/// Resolve `phrase` with a caller-supplied extractor.
///
/// `reference` must already be expressed in the caller's offset.
pub fn resolve_with<E: Extractor + ?Sized>(
    extractor: &E,
    phrase: &str,
    reference: &DateTime<FixedOffset>,
) -> Result<TimeRange> {
    let matches = extractor.extract(phrase, reference);
    if matches.is_empty() {
        info!(phrase, "could not parse datetime from phrase");
    }
    resolve_matches(phrase, reference, &matches)
}

/// Apply the resolution policy to matches already extracted from `phrase`.
///
/// # Errors
///
/// [`AfkError::Unparseable`] when `matches` is empty;
/// [`AfkError::InvalidDatetime`] if a boundary falls outside chrono's range.
pub fn resolve_matches(
    phrase: &str,
    reference: &DateTime<FixedOffset>,
    matches: &[ParsedMatch],
) -> Result<TimeRange> {
    match matches {
        [] => Err(AfkError::Unparseable(phrase.to_string())),
        [only] => resolve_single(phrase, reference, only),
        [first, second, ..] => resolve_pair(first, second),
    }
}

/// `true` when the phrase signals an open-ended start.
pub fn has_directional_keyword(phrase: &str) -> bool {
    DIRECTIONAL_KEYWORDS.iter().any(|k| phrase.contains(k))
}

fn resolve_single(
    phrase: &str,
    reference: &DateTime<FixedOffset>,
    only: &ParsedMatch,
) -> Result<TimeRange> {
    let instant = only.instant;
    let accuracy = only.accuracy;

    let range = if has_directional_keyword(phrase) {
        debug!(%accuracy, "directional phrase: start at match, end at end of day");
        TimeRange::new(instant, eod(&instant)?)
    } else if accuracy.is_at_or_coarser_than(Accuracy::Week) {
        debug!(%accuracy, "coarse match: until end of its day");
        TimeRange::new(*reference, eod(&instant)?)
    } else if accuracy == Accuracy::Day {
        debug!(%accuracy, "day match: clamped to reference, until end of day");
        let midnight = start_of_day(&instant).ok_or_else(|| out_of_range(&instant))?;
        let start = max(*reference, midnight);
        TimeRange::new(start, eod(&start)?)
    } else if matches!(accuracy, Accuracy::Hour | Accuracy::Minute | Accuracy::Second) {
        debug!(%accuracy, "precise match: end boundary");
        TimeRange::new(*reference, instant)
    } else {
        debug!(%accuracy, "no rule for accuracy, zero-length range at reference");
        TimeRange::new(*reference, *reference)
    };
    Ok(range)
}

fn resolve_pair(first: &ParsedMatch, second: &ParsedMatch) -> Result<TimeRange> {
    let start = first.instant;
    let boundary = Boundary::from_match(second);
    debug!(?boundary, "two matches: first is start");
    let end = boundary.resolve(&start).ok_or_else(|| out_of_range(&start))?;
    Ok(TimeRange::new(start, end))
}

/// How the second of two matches bounds the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// The match is the end instant itself.
    Absolute(DateTime<FixedOffset>),
    /// The match's clock fields are a length to add to the start.
    Elapsed(Duration),
}

impl Boundary {
    fn from_match(m: &ParsedMatch) -> Self {
        if m.accuracy.is_at_or_finer_than(Accuracy::HalfDay) {
            let seconds = i64::from(m.instant.time().num_seconds_from_midnight());
            Boundary::Elapsed(Duration::seconds(seconds))
        } else {
            Boundary::Absolute(m.instant)
        }
    }

    fn resolve(self, start: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        match self {
            Boundary::Absolute(end) => Some(end),
            Boundary::Elapsed(length) => start.checked_add_signed(length),
        }
    }
}

fn eod(dt: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    end_of_day(dt).ok_or_else(|| out_of_range(dt))
}

fn out_of_range(dt: &DateTime<FixedOffset>) -> AfkError {
    AfkError::InvalidDatetime(format!("day boundary of {dt} is out of range"))
}

// ── Tests ───────────────────────────────────────────────────────────────────
