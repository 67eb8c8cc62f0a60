//! Due-date countdown for the pregnancy screen.
//!
//! Standard 280-day term anchored at `due_date - 280 days`. The reference
//! date is passed in, never read from a clock.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a full term in days (40 weeks)
pub const TERM_DAYS: i64 = 280;

/// Derived countdown values for a due date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PregnancyCountdown {
    /// Days until the due date; negative once overdue
    pub days_remaining: i64,
    /// 1-based week of pregnancy, capped at 42
    pub week: u32,
    pub trimester: u8,
    /// Fraction of the term elapsed, 0.0..=1.0
    pub progress: f64,
}

impl PregnancyCountdown {
    pub fn to_dto(&self) -> shared::PregnancyCountdownDto {
        shared::PregnancyCountdownDto {
            days_remaining: self.days_remaining,
            week: self.week,
            trimester: self.trimester,
            progress: self.progress,
        }
    }
}

/// Compute the countdown for a due date as of `today`.
///
/// Total for any input pair: a due date far in the future simply reads as
/// week 1 with zero progress, and an overdue pregnancy reports negative
/// `days_remaining` while week stays capped at 42.
pub fn countdown(due: NaiveDate, today: NaiveDate) -> PregnancyCountdown {
    let days_remaining = (due - today).num_days();
    let start = due - Duration::days(TERM_DAYS);
    let day_of_term = (today - start).num_days().max(0);

    let week = (day_of_term / 7 + 1).min(42) as u32;
    let trimester = match week {
        0..=13 => 1,
        14..=27 => 2,
        _ => 3,
    };
    let progress = (day_of_term as f64 / TERM_DAYS as f64).clamp(0.0, 1.0);

    PregnancyCountdown {
        days_remaining,
        week,
        trimester,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_on_the_due_date() {
        let result = countdown(date(2024, 9, 1), date(2024, 9, 1));

        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.week, 41); // day 280 of the term is week 41, day 1
        assert_eq!(result.trimester, 3);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_mid_pregnancy() {
        let due = date(2024, 9, 1);
        // 140 days before the due date: exactly half the term
        let result = countdown(due, date(2024, 4, 14));

        assert_eq!(result.days_remaining, 140);
        assert_eq!(result.week, 21);
        assert_eq!(result.trimester, 2);
        assert_eq!(result.progress, 0.5);
    }

    #[test]
    fn test_first_trimester() {
        let due = date(2024, 9, 1);
        let result = countdown(due, date(2023, 12, 20));

        assert_eq!(result.week, 4);
        assert_eq!(result.trimester, 1);
    }

    #[test]
    fn test_overdue_is_reported_as_is() {
        let result = countdown(date(2024, 9, 1), date(2024, 9, 10));

        assert_eq!(result.days_remaining, -9);
        assert_eq!(result.week, 42); // capped
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_due_date_far_in_future_clamps_to_week_one() {
        let result = countdown(date(2026, 1, 1), date(2024, 9, 1));

        assert_eq!(result.week, 1);
        assert_eq!(result.trimester, 1);
        assert_eq!(result.progress, 0.0);
    }
}
