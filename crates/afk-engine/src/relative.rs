//! Calendar-correct relative offsets ("N months", "N years").
//!
//! A [`RelativeOffset`] is not a wall-clock duration: adding one month to
//! January 15 moves 31 days, to February 15 only 28 or 29. Month and year
//! fields are shifted on the calendar first, then the sub-day part is
//! added as a flat [`Duration`].

use std::ops::Add;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// `years` and `months` shifted on the calendar, then `subday` added flat.
///
/// `months` is kept normalized to `-11..=11` with the same sign as the
/// overall month count, so `months(12)` and `years(1)` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeOffset {
    years: i32,
    months: i32,
    subday: Duration,
}

impl RelativeOffset {
    pub fn new(years: i32, months: i32, subday: Duration) -> Self {
        Self {
            years: years.saturating_add(months / 12),
            months: months % 12,
            subday,
        }
    }

    pub fn months(months: i32) -> Self {
        Self::new(0, months, Duration::zero())
    }

    pub fn years(years: i32) -> Self {
        Self::new(years, 0, Duration::zero())
    }

    pub fn year_part(&self) -> i32 {
        self.years
    }

    pub fn month_part(&self) -> i32 {
        self.months
    }

    pub fn subday_part(&self) -> Duration {
        self.subday
    }

    /// Apply the offset to `anchor`.
    ///
    /// The time of day is preserved. If the anchor's day does not exist in
    /// the target month (Jan 31 + 1 month) it is clamped to the last day of
    /// that month. Returns `None` only when the result falls outside the
    /// representable range.
    pub fn add_to<Tz: TimeZone>(&self, anchor: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let local = anchor.naive_local();
        let date = shift_months(local.date(), self.years, self.months)?;
        let shifted = anchor
            .timezone()
            .from_local_datetime(&date.and_time(local.time()))
            .earliest()?;
        shifted.checked_add_signed(self.subday)
    }
}

impl Default for RelativeOffset {
    fn default() -> Self {
        Self::new(0, 0, Duration::zero())
    }
}

/// Field-wise composition. Saturates instead of overflowing.
impl Add for RelativeOffset {
    type Output = RelativeOffset;

    fn add(self, rhs: RelativeOffset) -> RelativeOffset {
        let subday = self.subday.checked_add(&rhs.subday).unwrap_or(
            if rhs.subday < Duration::zero() {
                Duration::MIN
            } else {
                Duration::MAX
            },
        );
        RelativeOffset::new(
            self.years.saturating_add(rhs.years),
            self.months + rhs.months,
            subday,
        )
    }
}

/// Shift `date` by whole years and months, carrying month overflow into
/// the year in either direction.
fn shift_months(date: NaiveDate, years: i32, months: i32) -> Option<NaiveDate> {
    // Zero-based month index: a remainder of 0 is January, never "month 0".
    let raw = i64::from(date.month0()) + i64::from(months);
    let year = i64::from(date.year()) + i64::from(years) + raw.div_euclid(12);
    let year = i32::try_from(year).ok()?;
    let month = u32::try_from(raw.rem_euclid(12)).ok()? + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    Some(NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, Timelike};
    use proptest::prelude::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_every_shift_within_a_year() {
        let anchor = at("2024-01-15T10:00:00+00:00");
        for n in 1..=12 {
            let result = RelativeOffset::months(n).add_to(&anchor).unwrap();
            let expected_month = u32::try_from(n % 12).unwrap() + 1;
            assert_eq!(result.month(), expected_month, "+{n} months");
            assert_eq!(result.year(), 2024 + n / 12, "+{n} months");
            assert_eq!(result.day(), 15);

            let back = RelativeOffset::months(-n).add_to(&anchor).unwrap();
            let expected_month = u32::try_from((12 - n) % 12).unwrap() + 1;
            assert_eq!(back.month(), expected_month, "-{n} months");
            assert_eq!(back.year(), 2023 + (12 - n) / 12, "-{n} months");
        }
    }

    #[test]
    fn test_one_month_forward() {
        let result = RelativeOffset::months(1)
            .add_to(&at("2024-03-15T10:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2024-04-15T10:00:00+00:00"));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let result = RelativeOffset::months(1)
            .add_to(&at("2024-12-05T08:30:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2025-01-05T08:30:00+00:00"));
    }

    #[test]
    fn test_zero_remainder_forward_lands_on_december() {
        // March + 9 months: the month index lands exactly on a multiple of 12
        let result = RelativeOffset::months(9)
            .add_to(&at("2024-03-15T10:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2024-12-15T10:00:00+00:00"));
    }

    #[test]
    fn test_zero_remainder_backward_lands_on_previous_december() {
        let result = RelativeOffset::months(-3)
            .add_to(&at("2024-03-15T10:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2023-12-15T10:00:00+00:00"));
    }

    #[test]
    fn test_exact_twelve_and_twenty_four_months() {
        let anchor = at("2024-03-15T10:00:00+00:00");
        assert_eq!(
            RelativeOffset::months(12).add_to(&anchor).unwrap(),
            at("2025-03-15T10:00:00+00:00")
        );
        assert_eq!(
            RelativeOffset::months(24).add_to(&anchor).unwrap(),
            at("2026-03-15T10:00:00+00:00")
        );
        assert_eq!(
            RelativeOffset::months(-12).add_to(&anchor).unwrap(),
            at("2023-03-15T10:00:00+00:00")
        );
    }

    #[test]
    fn test_negative_months_carry_multiple_years() {
        // March 2024 - 15 months = December 2022
        let result = RelativeOffset::months(-15)
            .add_to(&at("2024-03-15T10:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2022-12-15T10:00:00+00:00"));

        let result = RelativeOffset::months(-6)
            .add_to(&at("2024-03-15T10:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2023-09-15T10:00:00+00:00"));
    }

    #[test]
    fn test_day_clamped_to_end_of_shorter_month() {
        let result = RelativeOffset::months(1)
            .add_to(&at("2024-01-31T12:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2024-02-29T12:00:00+00:00"));

        let result = RelativeOffset::years(1)
            .add_to(&at("2024-02-29T12:00:00+00:00"))
            .unwrap();
        assert_eq!(result, at("2025-02-28T12:00:00+00:00"));
    }

    #[test]
    fn test_subday_added_after_calendar_shift() {
        let offset = RelativeOffset::new(0, 1, Duration::hours(20));
        let result = offset.add_to(&at("2024-01-31T10:00:00+00:00")).unwrap();
        // Clamp to Feb 29 first, then 20h rolls into March 1
        assert_eq!(result, at("2024-03-01T06:00:00+00:00"));
    }

    #[test]
    fn test_preserves_fixed_offset() {
        let result = RelativeOffset::months(2)
            .add_to(&at("2024-03-15T23:30:00+05:30"))
            .unwrap();
        assert_eq!(result.offset().local_minus_utc(), 19800);
        assert_eq!(result.naive_local().hour(), 23);
        assert_eq!(result.month(), 5);
    }

    #[test]
    fn test_zero_offset_is_noop() {
        let anchor = at("2024-03-15T10:00:00+00:00");
        assert_eq!(RelativeOffset::default().add_to(&anchor).unwrap(), anchor);
    }

    #[test]
    fn test_months_normalized_into_years() {
        let offset = RelativeOffset::months(14);
        assert_eq!(offset.year_part(), 1);
        assert_eq!(offset.month_part(), 2);

        let offset = RelativeOffset::months(-14);
        assert_eq!(offset.year_part(), -1);
        assert_eq!(offset.month_part(), -2);
    }

    #[test]
    fn test_compose_offsets() {
        let sum = RelativeOffset::new(0, 8, Duration::minutes(30))
            + RelativeOffset::new(1, 7, Duration::minutes(45));
        assert_eq!(sum.year_part(), 2);
        assert_eq!(sum.month_part(), 3);
        assert_eq!(sum.subday_part(), Duration::minutes(75));

        let mixed = RelativeOffset::months(-5) + RelativeOffset::months(2);
        assert_eq!(mixed, RelativeOffset::months(-3));
    }

    #[test]
    fn test_compose_saturates_subday() {
        let huge = RelativeOffset::new(0, 0, Duration::MAX);
        assert_eq!((huge + huge).subday_part(), Duration::MAX);
        let tiny = RelativeOffset::new(0, 0, Duration::MIN);
        assert_eq!((tiny + tiny).subday_part(), Duration::MIN);
    }

    #[test]
    fn test_out_of_range_returns_none() {
        let anchor = DateTime::<chrono::Utc>::from_naive_utc_and_offset(NaiveDateTime::MAX, chrono::Utc);
        assert!(RelativeOffset::years(1).add_to(&anchor).is_none());
    }

    proptest! {
        #[test]
        fn twelve_months_equals_one_year(
            days in 0i64..200_000,
            secs in 0i64..86_400,
            years in -50i32..50,
        ) {
            let anchor = at("1800-01-01T00:00:00+00:00")
                + Duration::days(days)
                + Duration::seconds(secs);
            prop_assert_eq!(
                RelativeOffset::months(12 * years).add_to(&anchor),
                RelativeOffset::years(years).add_to(&anchor)
            );
        }

        #[test]
        fn minus_one_then_plus_one_month_round_trips(days in 0i64..200_000) {
            let anchor = at("1800-01-01T09:15:00+00:00") + Duration::days(days);
            let back = RelativeOffset::months(-1).add_to(&anchor).unwrap();
            let forth = RelativeOffset::months(1).add_to(&back).unwrap();
            prop_assert_eq!(forth.year(), anchor.year());
            prop_assert_eq!(forth.month(), anchor.month());
        }

        #[test]
        fn month_shift_never_changes_time_of_day(
            days in 0i64..200_000,
            secs in 0i64..86_400,
            months in -240i32..240,
        ) {
            let anchor = at("1800-01-01T00:00:00+00:00")
                + Duration::days(days)
                + Duration::seconds(secs);
            let shifted = RelativeOffset::months(months).add_to(&anchor).unwrap();
            prop_assert_eq!(shifted.time(), anchor.time());
        }
    }
}
