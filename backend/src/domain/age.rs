//! Calendar arithmetic for the baby tracker.
//!
//! chrono has no built-in year/month/day difference, so the calendar-aware
//! rules live here: month addition clamps to the end of shorter months, and
//! the age breakdown counts whole calendar months rather than dividing a
//! day count by 365. Milestone target dates and the pregnancy countdown
//! both build on these functions, which is why the rollover behavior is
//! pinned down by tests.
//!
//! All functions are pure; the reference date is always passed in.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Elapsed time between a birth date and a reference date, broken down
/// calendar-aware. `years/months/days` carry the "1 year, 2 months, 3 days"
/// display; the totals feed milestone and estimate computations.
///
/// Precondition: `birth <= today`. Not enforced here; an inverted range
/// yields negative components, so callers guard and render "not yet born"
/// instead of calling this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBreakdown {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub total_months: i32,
}

impl AgeBreakdown {
    pub fn to_dto(&self) -> shared::AgeBreakdownDto {
        shared::AgeBreakdownDto {
            years: self.years,
            months: self.months,
            days: self.days,
            total_days: self.total_days,
            total_weeks: self.total_weeks,
            total_months: self.total_months,
        }
    }
}

/// Compute the calendar-aware age breakdown.
///
/// Whole months are counted by advancing `birth` month by month (with
/// end-of-month clamping) for as long as the result stays on or before
/// `today`; the leftover days are the difference to the last anchor. This
/// is what makes birth 2023-01-31 / today 2023-03-01 come out as
/// 0 years, 1 month, 1 day instead of 0 months, 29 days.
pub fn age_breakdown(birth: NaiveDate, today: NaiveDate) -> AgeBreakdown {
    let total_days = (today - birth).num_days();

    let mut total_months =
        (today.year() - birth.year()) * 12 + today.month() as i32 - birth.month() as i32;
    if add_months(birth, total_months) > today {
        total_months -= 1;
    }

    let anchor = add_months(birth, total_months);
    let days = (today - anchor).num_days() as i32;

    AgeBreakdown {
        years: total_months.div_euclid(12),
        months: total_months.rem_euclid(12),
        days,
        total_days,
        total_weeks: total_days.div_euclid(7),
        total_months,
    }
}

/// Add calendar months to a date, clamping to the last valid day of the
/// target month: Jan 31 + 1 month = Feb 28 (Feb 29 in a leap year).
/// Negative `months` subtracts with the same clamping.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // Clamped day is always valid for the target month
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Add calendar days to a date
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Get the number of days in a given month and year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Parse a strict `YYYY-MM-DD` date string.
///
/// Date-only values stay `NaiveDate` end to end, so no timezone can shift
/// them; this parser is the only place a date-only string enters the
/// domain.
pub fn parse_date_only(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date_only(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
