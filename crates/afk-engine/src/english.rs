//! Rule-based English time-expression extractor.
//!
//! Recognizes the vocabulary people use in away messages: lengths
//! ("30 min", "an hour", "-1 month", "2 hours ago"), clock times ("5pm",
//! "5:30 pm", "17:30"), day references ("today", "tomorrow", "monday",
//! "march 20", "2024-04-01", "eod") and a few coarse periods ("next week").
//!
//! A day reference next to a clock time ("1pm on monday", "tomorrow at
//! 11am") is reported as a single match at that day and time.
//!
//! # Lengths after a range marker
//!
//! In "from 4pm for 1 hr" the second expression is a length, not a point
//! in time. When a length follows an earlier match across one of
//! [`RANGE_MARKERS`], fine-grained lengths (hours and below) are measured
//! from midnight of the reference day, so the clock fields of the reported
//! instant carry the elapsed time. Coarse lengths (days and above) are
//! measured from the earlier match instead.

use std::ops::Range;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Weekday};
use tracing::debug;

use crate::accuracy::Accuracy;
use crate::day::start_of_day;
use crate::extract::{Extractor, ParsedMatch};
use crate::relative::RelativeOffset;

/// Words that split a phrase into a start part and a length/end part.
pub const RANGE_MARKERS: [&str; 3] = ["to", "till", "for"];

/// Words allowed between a day reference and a clock time they attach to.
const CONNECTORS: [&str; 2] = ["at", "on"];

/// The default [`Extractor`]: a fixed English vocabulary, case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishExtractor;

impl EnglishExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for EnglishExtractor {
    fn extract(&self, phrase: &str, reference: &DateTime<FixedOffset>) -> Vec<ParsedMatch> {
        let tokens = tokenize(phrase);
        let candidates = merge_day_and_clock(scan(&tokens), &tokens);

        let mut matches: Vec<ParsedMatch> = Vec::with_capacity(candidates.len());
        let mut previous: Option<(usize, DateTime<FixedOffset>)> = None;

        for candidate in candidates {
            let after = previous.and_then(|(end, instant)| {
                tokens[end..candidate.tokens.start]
                    .iter()
                    .any(|t| RANGE_MARKERS.contains(&t.text.as_str()))
                    .then_some(instant)
            });

            let Some(instant) = candidate.expr.instant(reference, after.as_ref()) else {
                debug!(expr = ?candidate.expr, "time expression out of range, skipped");
                continue;
            };

            let span = tokens[candidate.tokens.start].span.start
                ..tokens[candidate.tokens.end - 1].span.end;
            let parsed = ParsedMatch::new(
                instant,
                candidate.expr.accuracy(),
                span.clone(),
                &phrase[span],
            );
            debug!(
                text = %parsed.text,
                accuracy = %parsed.accuracy,
                instant = %parsed.instant,
                "extracted time expression"
            );

            previous = Some((candidate.tokens.end, instant));
            matches.push(parsed);
        }

        matches
    }
}

// ── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn accuracy(self) -> Accuracy {
        match self {
            Unit::Second => Accuracy::Second,
            Unit::Minute => Accuracy::Minute,
            Unit::Hour => Accuracy::Hour,
            Unit::Day => Accuracy::Day,
            Unit::Week => Accuracy::Week,
            Unit::Month => Accuracy::Month,
            Unit::Year => Accuracy::Year,
        }
    }

    /// Move `anchor` by `amount` of this unit. Months and years move on the
    /// calendar; everything else is a flat duration.
    fn shift(self, anchor: &DateTime<FixedOffset>, amount: i64) -> Option<DateTime<FixedOffset>> {
        let flat = match self {
            Unit::Second => Duration::try_seconds(amount)?,
            Unit::Minute => Duration::try_minutes(amount)?,
            Unit::Hour => Duration::try_hours(amount)?,
            Unit::Day => Duration::try_days(amount)?,
            Unit::Week => Duration::try_weeks(amount)?,
            Unit::Month => {
                return RelativeOffset::months(i32::try_from(amount).ok()?).add_to(anchor);
            }
            Unit::Year => {
                return RelativeOffset::years(i32::try_from(amount).ok()?).add_to(anchor);
            }
        };
        anchor.checked_add_signed(flat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayRef {
    Today,
    Tomorrow,
    Yesterday,
    Weekday(Weekday),
    MonthDay { month: u32, day: u32 },
    Date(NaiveDate),
}

impl DayRef {
    fn date(self, reference: &DateTime<FixedOffset>) -> Option<NaiveDate> {
        let today = reference.date_naive();
        match self {
            DayRef::Today => Some(today),
            DayRef::Tomorrow => today.succ_opt(),
            DayRef::Yesterday => today.pred_opt(),
            DayRef::Weekday(weekday) => {
                // Always future: if today is the same weekday, go to next week
                let days_ahead = (i64::from(weekday.num_days_from_monday())
                    - i64::from(today.weekday().num_days_from_monday())
                    + 7)
                    % 7;
                let days_ahead = if days_ahead == 0 { 7 } else { days_ahead };
                today.checked_add_signed(Duration::try_days(days_ahead)?)
            }
            DayRef::MonthDay { month, day } => {
                // This year unless already past, then next year
                match NaiveDate::from_ymd_opt(today.year(), month, day) {
                    Some(date) if date >= today => Some(date),
                    _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
                }
            }
            DayRef::Date(date) => Some(date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expr {
    /// A signed length: "30 min", "-1 month", "2 hours ago".
    Offset { amount: i64, unit: Unit },
    Now,
    Day(DayRef),
    Clock { time: NaiveTime, accuracy: Accuracy },
    DayAt { day: DayRef, time: NaiveTime, accuracy: Accuracy },
    /// "next week", "next month", "next year".
    NextPeriod(Unit),
}

impl Expr {
    fn accuracy(self) -> Accuracy {
        match self {
            Expr::Offset { unit, .. } | Expr::NextPeriod(unit) => unit.accuracy(),
            Expr::Now => Accuracy::Now,
            Expr::Day(_) => Accuracy::Day,
            Expr::Clock { accuracy, .. } | Expr::DayAt { accuracy, .. } => accuracy,
        }
    }

    /// `after` is the instant of an earlier match separated from this one by
    /// a range marker, if any.
    fn instant(
        self,
        reference: &DateTime<FixedOffset>,
        after: Option<&DateTime<FixedOffset>>,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            Expr::Offset { amount, unit } => {
                let anchor = match after {
                    None => *reference,
                    Some(_) if unit.accuracy().is_at_or_finer_than(Accuracy::HalfDay) => {
                        start_of_day(reference)?
                    }
                    Some(previous) => *previous,
                };
                unit.shift(&anchor, amount)
            }
            Expr::Now => Some(*reference),
            Expr::Day(day) => at_local(reference, day.date(reference)?, NaiveTime::MIN),
            Expr::Clock { time, .. } => at_local(reference, reference.date_naive(), time),
            Expr::DayAt { day, time, .. } => at_local(reference, day.date(reference)?, time),
            Expr::NextPeriod(unit) => unit.shift(reference, 1),
        }
    }

    /// Attach a clock time to a day reference, in either order.
    fn combine(self, other: Expr) -> Option<Expr> {
        match (self, other) {
            (Expr::Day(day), Expr::Clock { time, accuracy })
            | (Expr::Clock { time, accuracy }, Expr::Day(day)) => {
                Some(Expr::DayAt { day, time, accuracy })
            }
            _ => None,
        }
    }
}

fn at_local(
    reference: &DateTime<FixedOffset>,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<FixedOffset>> {
    reference
        .timezone()
        .from_local_datetime(&date.and_time(time))
        .single()
}

// ── Tokenizing and scanning ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Token {
    /// Lowercased, edge punctuation stripped.
    text: String,
    /// Byte range in the original phrase.
    span: Range<usize>,
}

#[derive(Debug, Clone)]
struct Candidate {
    /// Token index range.
    tokens: Range<usize>,
    expr: Expr,
}

fn tokenize(phrase: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, ch) in phrase.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                push_token(&mut tokens, phrase, s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push_token(&mut tokens, phrase, s..phrase.len());
    }
    tokens
}

fn push_token(tokens: &mut Vec<Token>, phrase: &str, span: Range<usize>) {
    let raw = &phrase[span.clone()];
    let leading = raw.trim_start_matches(is_edge_punctuation);
    let trimmed = leading.trim_end_matches(is_edge_punctuation);
    if trimmed.is_empty() {
        return;
    }
    let start = span.start + (raw.len() - leading.len());
    tokens.push(Token {
        text: trimmed.to_lowercase(),
        span: start..start + trimmed.len(),
    });
}

fn is_edge_punctuation(ch: char) -> bool {
    matches!(ch, ',' | '.' | '!' | '?' | ';' | '(' | ')' | '"' | '\'')
}

type Rule = fn(&[Token]) -> Option<(usize, Expr)>;

const RULES: [Rule; 6] = [
    try_offset,
    try_clock,
    try_day,
    try_next_period,
    try_named_time,
    try_now,
];

/// Greedy left-to-right scan; at each position the longest rule wins.
fn scan(tokens: &[Token]) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let best = RULES
            .iter()
            .filter_map(|rule| rule(&tokens[i..]))
            .max_by_key(|(len, _)| *len);
        match best {
            Some((len, expr)) => {
                found.push(Candidate {
                    tokens: i..i + len,
                    expr,
                });
                i += len;
            }
            None => i += 1,
        }
    }
    found
}

fn merge_day_and_clock(found: Vec<Candidate>, tokens: &[Token]) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::with_capacity(found.len());
    for candidate in found {
        if let Some(prev) = merged.last_mut() {
            let gap = &tokens[prev.tokens.end..candidate.tokens.start];
            let adjacent =
                gap.len() <= 1 && gap.iter().all(|t| CONNECTORS.contains(&t.text.as_str()));
            if adjacent {
                if let Some(expr) = prev.expr.combine(candidate.expr) {
                    prev.tokens.end = candidate.tokens.end;
                    prev.expr = expr;
                    continue;
                }
            }
        }
        merged.push(candidate);
    }
    merged
}

fn word(tokens: &[Token], i: usize) -> Option<&str> {
    tokens.get(i).map(|t| t.text.as_str())
}

// ── Rules ───────────────────────────────────────────────────────────────────

/// "30 min", "30min", "3h", "an hour", "-1 month", "2 hours ago".
fn try_offset(tokens: &[Token]) -> Option<(usize, Expr)> {
    let first = word(tokens, 0)?;
    let (amount, unit, mut len) = match split_leading_number(first) {
        Some((n, "")) => (n, parse_unit(word(tokens, 1)?)?, 2),
        Some((n, fused)) => (n, parse_unit(fused)?, 1),
        None => (parse_count_word(first)?, parse_unit(word(tokens, 1)?)?, 2),
    };
    let amount = if word(tokens, len) == Some("ago") {
        len += 1;
        amount.checked_neg()?
    } else {
        amount
    };
    Some((len, Expr::Offset { amount, unit }))
}

/// "5pm", "5:30pm", "17:30", "5 pm".
fn try_clock(tokens: &[Token]) -> Option<(usize, Expr)> {
    let first = word(tokens, 0)?;
    if let Some((time, accuracy)) = parse_clock(first) {
        return Some((1, Expr::Clock { time, accuracy }));
    }
    let meridiem = word(tokens, 1)?.replace('.', "");
    if meridiem != "am" && meridiem != "pm" {
        return None;
    }
    let (time, accuracy) = parse_clock(&format!("{first}{meridiem}"))?;
    Some((2, Expr::Clock { time, accuracy }))
}

/// "today", "tomorrow", "monday", "next friday", "march 20", "2024-04-01", "eod".
fn try_day(tokens: &[Token]) -> Option<(usize, Expr)> {
    let first = word(tokens, 0)?;
    let (len, day) = match first {
        "today" | "eod" => (1, DayRef::Today),
        "tomorrow" | "tmrw" => (1, DayRef::Tomorrow),
        "yesterday" => (1, DayRef::Yesterday),
        "next" => (2, DayRef::Weekday(parse_weekday(word(tokens, 1)?)?)),
        "end" => (try_end_of_day(tokens)?, DayRef::Today),
        _ => {
            if let Some(weekday) = parse_weekday(first) {
                (1, DayRef::Weekday(weekday))
            } else if let Ok(date) = NaiveDate::parse_from_str(first, "%Y-%m-%d") {
                (1, DayRef::Date(date))
            } else {
                try_month_day(tokens)?
            }
        }
    };
    Some((len, Expr::Day(day)))
}

/// "end of day", "end of the day".
fn try_end_of_day(tokens: &[Token]) -> Option<usize> {
    if word(tokens, 1)? != "of" {
        return None;
    }
    match word(tokens, 2)? {
        "day" => Some(3),
        "the" if word(tokens, 3)? == "day" => Some(4),
        _ => None,
    }
}

/// "march 20", "mar 20th", "20 march", "20th of march".
fn try_month_day(tokens: &[Token]) -> Option<(usize, DayRef)> {
    let first = word(tokens, 0)?;
    if let Some(month) = parse_month(first) {
        let day = parse_day_number(word(tokens, 1)?)?;
        return Some((2, DayRef::MonthDay { month, day }));
    }
    let day = parse_day_number(first)?;
    match word(tokens, 1)? {
        "of" => {
            let month = parse_month(word(tokens, 2)?)?;
            Some((3, DayRef::MonthDay { month, day }))
        }
        other => {
            let month = parse_month(other)?;
            Some((2, DayRef::MonthDay { month, day }))
        }
    }
}

/// "next week", "next month", "next year".
fn try_next_period(tokens: &[Token]) -> Option<(usize, Expr)> {
    if word(tokens, 0)? != "next" {
        return None;
    }
    let unit = match word(tokens, 1)? {
        "week" => Unit::Week,
        "month" => Unit::Month,
        "year" => Unit::Year,
        _ => return None,
    };
    Some((2, Expr::NextPeriod(unit)))
}

fn try_named_time(tokens: &[Token]) -> Option<(usize, Expr)> {
    let time = named_time_to_naive(word(tokens, 0)?)?;
    Some((
        1,
        Expr::Clock {
            time,
            accuracy: Accuracy::HalfDay,
        },
    ))
}

fn try_now(tokens: &[Token]) -> Option<(usize, Expr)> {
    (word(tokens, 0)? == "now").then_some((1, Expr::Now))
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Split "-30" into (-30, ""), "3hr" into (3, "hr").
fn split_leading_number(s: &str) -> Option<(i64, &str)> {
    let unsigned = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let number_end = (s.len() - unsigned.len()) + digits;
    let n: i64 = s[..number_end].parse().ok()?;
    Some((n, &s[number_end..]))
}

fn parse_count_word(s: &str) -> Option<i64> {
    match s {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => None,
    }
}

fn parse_unit(s: &str) -> Option<Unit> {
    match s {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::Second),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(Unit::Minute),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hour),
        "d" | "day" | "days" => Some(Unit::Day),
        "w" | "wk" | "wks" | "week" | "weeks" => Some(Unit::Week),
        "mo" | "mos" | "month" | "months" => Some(Unit::Month),
        "y" | "yr" | "yrs" | "year" | "years" => Some(Unit::Year),
        _ => None,
    }
}

/// Parse a clock time: "2pm", "2:30pm", "14:00", "14:30:15".
///
/// A bare number without am/pm is not a clock time. The accuracy follows
/// the finest field written out.
fn parse_clock(s: &str) -> Option<(NaiveTime, Accuracy)> {
    let (body, is_pm) = if let Some(body) = s.strip_suffix("pm") {
        (body, Some(true))
    } else if let Some(body) = s.strip_suffix("am") {
        (body, Some(false))
    } else {
        (s, None)
    };

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 || (is_pm.is_none() && parts.len() < 2) {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let hour: u32 = parts[0].parse().ok()?;
    let minute: u32 = match parts.get(1) {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let second: u32 = match parts.get(2) {
        Some(p) => p.parse().ok()?,
        None => 0,
    };

    let hour24 = match is_pm {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(true) if hour == 12 => 12,
        Some(false) if hour == 12 => 0,
        Some(true) => hour + 12,
        Some(false) | None => hour,
    };

    let accuracy = match parts.len() {
        1 => Accuracy::Hour,
        2 => Accuracy::Minute,
        _ => Accuracy::Second,
    };
    Some((NaiveTime::from_hms_opt(hour24, minute, second)?, accuracy))
}

fn named_time_to_naive(s: &str) -> Option<NaiveTime> {
    match s {
        "morning" => NaiveTime::from_hms_opt(9, 0, 0),
        "noon" | "midday" => NaiveTime::from_hms_opt(12, 0, 0),
        "afternoon" => NaiveTime::from_hms_opt(13, 0, 0),
        "evening" => NaiveTime::from_hms_opt(18, 0, 0),
        "tonight" | "night" => NaiveTime::from_hms_opt(21, 0, 0),
        "midnight" => NaiveTime::from_hms_opt(0, 0, 0),
        _ => None,
    }
}

/// Full or abbreviated lowercase weekday name.
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Full or abbreviated lowercase month name → 1-based month number.
fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// "20", "20th", "1st" → day of month.
fn parse_day_number(s: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| s.strip_suffix(*suffix))
        .unwrap_or(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

// ── Tests ───────────────────────────────────────────────────────────────────
