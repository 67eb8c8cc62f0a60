//! Tooth eruption summary over the primary dentition.
//!
//! Positions 1-20: 1-10 upper jaw, 11-20 lower jaw. The tooth chart itself
//! is drawn by the frontend; this module derives the counts and dates it
//! renders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::models::activity::{ActivityEntry, ActivityKind};

/// Derived eruption state for one baby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToothSummary {
    /// Distinct erupted positions
    pub erupted: u8,
    pub upper: u8,
    pub lower: u8,
    /// Most recently erupted position and its date
    pub latest: Option<(u8, NaiveDate)>,
}

/// Summarize tooth entries. Duplicate records for the same position count
/// once, with the latest recorded date winning; non-tooth entries are
/// ignored.
pub fn summarize(entries: &[ActivityEntry]) -> ToothSummary {
    let mut by_position: BTreeMap<u8, NaiveDate> = BTreeMap::new();
    for entry in entries {
        if let ActivityKind::Tooth { position } = entry.kind {
            let date = entry.date();
            by_position
                .entry(position)
                .and_modify(|existing| {
                    if date > *existing {
                        *existing = date;
                    }
                })
                .or_insert(date);
        }
    }

    let upper = by_position.keys().filter(|p| **p <= 10).count() as u8;
    let lower = by_position.len() as u8 - upper;
    let latest = by_position
        .iter()
        .max_by_key(|(_, date)| **date)
        .map(|(position, date)| (*position, *date));

    ToothSummary {
        erupted: by_position.len() as u8,
        upper,
        lower,
        latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn tooth(position: u8, timestamp: &str) -> ActivityEntry {
        ActivityEntry {
            id: format!("activity::tooth::{}", position),
            baby_id: "baby::1700000000000".to_string(),
            kind: ActivityKind::Tooth { position },
            timestamp: DateTime::parse_from_rfc3339(timestamp)
                .unwrap()
                .with_timezone(&Utc),
            quantity: Some(position as f64),
        }
    }

    fn sleep(timestamp: &str) -> ActivityEntry {
        ActivityEntry {
            id: "activity::sleep::1".to_string(),
            baby_id: "baby::1700000000000".to_string(),
            kind: ActivityKind::Sleep,
            timestamp: DateTime::parse_from_rfc3339(timestamp)
                .unwrap()
                .with_timezone(&Utc),
            quantity: None,
        }
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[]);

        assert_eq!(summary.erupted, 0);
        assert_eq!(summary.upper, 0);
        assert_eq!(summary.lower, 0);
        assert_eq!(summary.latest, None);
    }

    #[test]
    fn test_jaw_split_and_latest() {
        let entries = vec![
            tooth(5, "2024-06-01T09:00:00Z"),  // upper
            tooth(15, "2024-07-15T09:00:00Z"), // lower
            tooth(6, "2024-08-02T09:00:00Z"),  // upper
            sleep("2024-08-03T20:00:00Z"),     // ignored
        ];

        let summary = summarize(&entries);

        assert_eq!(summary.erupted, 3);
        assert_eq!(summary.upper, 2);
        assert_eq!(summary.lower, 1);
        assert_eq!(
            summary.latest,
            Some((6, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap()))
        );
    }

    #[test]
    fn test_duplicate_positions_count_once_latest_date_wins() {
        let entries = vec![
            tooth(5, "2024-06-01T09:00:00Z"),
            tooth(5, "2024-06-20T09:00:00Z"), // corrected date for the same tooth
        ];

        let summary = summarize(&entries);

        assert_eq!(summary.erupted, 1);
        assert_eq!(
            summary.latest,
            Some((5, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()))
        );
    }
}
