//! Milestone definitions and evaluation results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::age;

/// Offset of a milestone relative to the birth date.
///
/// The product's milestone list deliberately mixes day-based and
/// month-based offsets ("100 Tage" vs "6 Monate"), so both units are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneOffset {
    Days(i64),
    Months(u32),
}

/// A named, fixed offset from the birth date. Immutable; the default list
/// is static and results are recomputed on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneDefinition {
    pub name: &'static str,
    pub offset: MilestoneOffset,
}

impl MilestoneDefinition {
    /// Target date this milestone falls on for the given birth date.
    /// Month offsets clamp to the end of shorter months (Jan 31 + 1mo
    /// lands on Feb 28/29), same as all other month arithmetic here.
    pub fn target_date(&self, birth: NaiveDate) -> NaiveDate {
        match self.offset {
            MilestoneOffset::Days(days) => age::add_days(birth, days),
            MilestoneOffset::Months(months) => age::add_months(birth, months as i32),
        }
    }
}

/// Result of evaluating one milestone against a reference date.
/// Ephemeral: produced fresh from a `(birth, today)` pair, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneResult {
    pub name: String,
    pub reached: bool,
    /// The date the milestone was reached; `None` while still upcoming
    pub date: Option<NaiveDate>,
}

impl MilestoneResult {
    pub fn to_dto(&self) -> shared::MilestoneResultDto {
        shared::MilestoneResultDto {
            name: self.name.clone(),
            reached: self.reached,
            date: self.date.map(age::format_date_only),
        }
    }
}
