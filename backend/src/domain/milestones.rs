//! Milestone evaluation against a reference date.
//!
//! The milestone list is a fixed product decision: German labels, mixed
//! day/month offsets, and definition order that is chronological for
//! typical births but can invert near month boundaries ("100 Tage" is
//! day-based while its neighbors are month-based). That ordering is
//! preserved as-is; the output array order always equals the input
//! definition order.

use chrono::NaiveDate;
use log::debug;

use crate::domain::models::milestone::{MilestoneDefinition, MilestoneOffset, MilestoneResult};

/// The fixed milestone list shown on the baby screen, in display order.
pub const DEFAULT_MILESTONES: [MilestoneDefinition; 10] = [
    MilestoneDefinition { name: "1 Woche", offset: MilestoneOffset::Days(7) },
    MilestoneDefinition { name: "1 Monat", offset: MilestoneOffset::Months(1) },
    MilestoneDefinition { name: "2 Monate", offset: MilestoneOffset::Months(2) },
    MilestoneDefinition { name: "3 Monate", offset: MilestoneOffset::Months(3) },
    MilestoneDefinition { name: "100 Tage", offset: MilestoneOffset::Days(100) },
    MilestoneDefinition { name: "6 Monate", offset: MilestoneOffset::Months(6) },
    MilestoneDefinition { name: "9 Monate", offset: MilestoneOffset::Months(9) },
    MilestoneDefinition { name: "1 Jahr", offset: MilestoneOffset::Months(12) },
    MilestoneDefinition { name: "18 Monate", offset: MilestoneOffset::Months(18) },
    MilestoneDefinition { name: "2 Jahre", offset: MilestoneOffset::Months(24) },
];

/// Milestone service: evaluates definitions against a `(birth, today)` pair.
/// Stateless; every call is independent.
#[derive(Clone, Default)]
pub struct MilestoneService;

impl MilestoneService {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the default milestone list
    pub fn evaluate_default(&self, birth: NaiveDate, today: NaiveDate) -> Vec<MilestoneResult> {
        self.evaluate(birth, today, &DEFAULT_MILESTONES)
    }

    /// Evaluate a milestone list against a reference date.
    ///
    /// `reached` is a date-only comparison, so a milestone flips at
    /// midnight rather than at some time of day. The result carries the
    /// reached date; upcoming milestones report `date: None`.
    pub fn evaluate(
        &self,
        birth: NaiveDate,
        today: NaiveDate,
        defs: &[MilestoneDefinition],
    ) -> Vec<MilestoneResult> {
        defs.iter()
            .map(|def| {
                let target = def.target_date(birth);
                let reached = today >= target;
                MilestoneResult {
                    name: def.name.to_string(),
                    reached,
                    date: reached.then_some(target),
                }
            })
            .collect()
    }

    /// The next milestone still ahead, by target date, for countdown
    /// displays. Returns the definition together with its target date.
    pub fn next_upcoming(
        &self,
        birth: NaiveDate,
        today: NaiveDate,
    ) -> Option<(MilestoneDefinition, NaiveDate)> {
        let next = DEFAULT_MILESTONES
            .iter()
            .map(|def| (*def, def.target_date(birth)))
            .filter(|(_, target)| *target > today)
            .min_by_key(|(_, target)| *target);

        if let Some((def, target)) = &next {
            debug!("Next milestone for birth {}: {} on {}", birth, def.name, target);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_100_days_reached_before_6_months() {
        let service = MilestoneService::new();
        let today = date(2024, 9, 1);
        let birth = today - Duration::days(101);

        let results = service.evaluate_default(birth, today);

        let hundred_days = results.iter().find(|r| r.name == "100 Tage").unwrap();
        let six_months = results.iter().find(|r| r.name == "6 Monate").unwrap();
        assert!(hundred_days.reached);
        assert!(!six_months.reached);
    }

    #[test]
    fn test_output_order_matches_definition_order() {
        let service = MilestoneService::new();
        let today = date(2024, 9, 1);
        let birth = today - Duration::days(101);

        let results = service.evaluate_default(birth, today);

        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        let expected: Vec<&str> = DEFAULT_MILESTONES.iter().map(|d| d.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_reached_on_the_target_date_itself() {
        let service = MilestoneService::new();
        let birth = date(2024, 1, 1);

        // "1 Woche" falls on Jan 8; it counts as reached that whole day
        let results = service.evaluate_default(birth, date(2024, 1, 8));
        let one_week = results.iter().find(|r| r.name == "1 Woche").unwrap();
        assert!(one_week.reached);
        assert_eq!(one_week.date, Some(date(2024, 1, 8)));

        let results = service.evaluate_default(birth, date(2024, 1, 7));
        let one_week = results.iter().find(|r| r.name == "1 Woche").unwrap();
        assert!(!one_week.reached);
        assert_eq!(one_week.date, None);
    }

    #[test]
    fn test_month_milestones_clamp_for_month_end_births() {
        let service = MilestoneService::new();
        let birth = date(2024, 1, 31);

        // "1 Monat" clamps to Feb 29 in the 2024 leap year
        let results = service.evaluate_default(birth, date(2024, 2, 29));
        let one_month = results.iter().find(|r| r.name == "1 Monat").unwrap();
        assert!(one_month.reached);
        assert_eq!(one_month.date, Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let service = MilestoneService::new();
        let birth = date(2024, 3, 10);
        let today = date(2024, 8, 1);

        let first = service.evaluate_default(birth, today);
        let second = service.evaluate_default(birth, today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_next_upcoming() {
        let service = MilestoneService::new();
        let birth = date(2024, 1, 1);

        // 40 days in: "1 Woche" and "1 Monat" are past, "2 Monate" is next
        let (def, target) = service.next_upcoming(birth, date(2024, 2, 10)).unwrap();
        assert_eq!(def.name, "2 Monate");
        assert_eq!(target, date(2024, 3, 1));
    }

    #[test]
    fn test_next_upcoming_exhausted_list() {
        let service = MilestoneService::new();
        let birth = date(2020, 1, 1);

        // A four-year-old has passed every entry in the list
        assert!(service.next_upcoming(birth, date(2024, 6, 1)).is_none());
    }
}
