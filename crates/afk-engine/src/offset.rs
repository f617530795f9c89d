//! Fixed UTC offsets supplied by the caller.
//!
//! Only numeric offsets are accepted; there is no timezone database.

use chrono::FixedOffset;

use crate::error::{AfkError, Result};

/// Largest offset magnitude chrono accepts, in seconds.
pub const MAX_OFFSET_SECONDS: i32 = 86_399;

/// Build a [`FixedOffset`] east of UTC, rejecting anything beyond ±1 day.
pub fn fixed_offset(seconds: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(seconds).ok_or_else(|| {
        AfkError::InvalidOffset(format!(
            "{seconds} seconds is outside ±{MAX_OFFSET_SECONDS}"
        ))
    })
}

/// Parse a UTC offset.
///
/// Accepts integer seconds (`"19800"`, `"-3600"`), `"±HH:MM"` and
/// `"Z"`/`"UTC"`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return fixed_offset(0);
    }
    if let Ok(seconds) = s.parse::<i32>() {
        return fixed_offset(seconds);
    }

    let invalid = || AfkError::InvalidOffset(format!("'{s}'"));
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(hours) || !all_digits(minutes) {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    let seconds = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60))
        .ok_or_else(invalid)?;
    fixed_offset(sign * seconds)
}
