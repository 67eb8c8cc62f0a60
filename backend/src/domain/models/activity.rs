//! Validated activity entry, parsed from the loose backend row.
//!
//! The backing store hands us `shared::ActivityRecord` rows where every
//! interesting field is optional or stringly typed. This module is the
//! boundary where those rows become typed entries. Parsing a row can fail;
//! the aggregation layer skips failed rows and counts them, so a single bad
//! record never aborts a computation.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use thiserror::Error;

/// How a feeding was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedingKind {
    Breast,
    Bottle,
    Solids,
}

/// Which body measurement a growth entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthMeasure {
    /// Weight in kilograms
    Weight,
    /// Height in centimeters
    Height,
}

/// Tagged union over the entry sub-types the tracker knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Feeding(FeedingKind),
    Sleep,
    Growth(GrowthMeasure),
    /// Primary dentition position 1-20; 1-10 upper jaw, 11-20 lower jaw
    Tooth { position: u8 },
    Diaper,
}

impl ActivityKind {
    /// Stable label used for per-kind statistics buckets
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Feeding(FeedingKind::Breast) => "feeding.breast",
            ActivityKind::Feeding(FeedingKind::Bottle) => "feeding.bottle",
            ActivityKind::Feeding(FeedingKind::Solids) => "feeding.solids",
            ActivityKind::Sleep => "sleep",
            ActivityKind::Growth(GrowthMeasure::Weight) => "growth.weight",
            ActivityKind::Growth(GrowthMeasure::Height) => "growth.height",
            ActivityKind::Tooth { .. } => "tooth",
            ActivityKind::Diaper => "diaper",
        }
    }
}

/// A validated, typed activity event
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub baby_id: String,
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
    /// ml for feedings, kg/cm for growth; absent for plain events
    pub quantity: Option<f64>,
}

/// Why a row was rejected during validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record has no timestamp")]
    MissingTimestamp,
    #[error("unparseable timestamp: {0}")]
    BadTimestamp(String),
    #[error("unknown entry type: {0}")]
    UnknownEntryType(String),
    #[error("entry type {0} requires a subtype")]
    MissingSubtype(String),
    #[error("unknown subtype: {0}")]
    UnknownSubtype(String),
    #[error("quantity is not a finite number")]
    BadQuantity,
    #[error("tooth position out of range 1-20: {0}")]
    BadToothPosition(f64),
}

impl ActivityEntry {
    /// Validate a raw row into a typed entry.
    ///
    /// Entry types and subtypes are matched case-insensitively because the
    /// backing store is not consistent about casing.
    pub fn from_record(record: &shared::ActivityRecord) -> Result<ActivityEntry, RecordError> {
        let raw_time = record
            .start_time
            .as_deref()
            .ok_or(RecordError::MissingTimestamp)?;
        let timestamp = DateTime::parse_from_rfc3339(raw_time)
            .map_err(|_| RecordError::BadTimestamp(raw_time.to_string()))?
            .with_timezone(&Utc);

        let quantity = match record.quantity {
            Some(q) if !q.is_finite() => return Err(RecordError::BadQuantity),
            other => other,
        };

        let kind = Self::parse_kind(record, quantity)?;

        Ok(ActivityEntry {
            id: record.id.clone(),
            baby_id: record.baby_id.clone(),
            kind,
            timestamp,
            quantity,
        })
    }

    fn parse_kind(
        record: &shared::ActivityRecord,
        quantity: Option<f64>,
    ) -> Result<ActivityKind, RecordError> {
        let entry_type = record.entry_type.to_uppercase();
        let subtype = record.subtype.as_deref().map(str::to_uppercase);

        match entry_type.as_str() {
            "FEEDING" => {
                let subtype =
                    subtype.ok_or_else(|| RecordError::MissingSubtype(entry_type.clone()))?;
                let feeding = match subtype.as_str() {
                    "BREAST" => FeedingKind::Breast,
                    "BOTTLE" => FeedingKind::Bottle,
                    "SOLIDS" => FeedingKind::Solids,
                    _ => return Err(RecordError::UnknownSubtype(subtype)),
                };
                Ok(ActivityKind::Feeding(feeding))
            }
            "SLEEP" => Ok(ActivityKind::Sleep),
            "GROWTH" => {
                let subtype =
                    subtype.ok_or_else(|| RecordError::MissingSubtype(entry_type.clone()))?;
                let measure = match subtype.as_str() {
                    "WEIGHT" => GrowthMeasure::Weight,
                    "HEIGHT" => GrowthMeasure::Height,
                    _ => return Err(RecordError::UnknownSubtype(subtype)),
                };
                Ok(ActivityKind::Growth(measure))
            }
            "TOOTH" => {
                let raw = quantity.ok_or(RecordError::BadToothPosition(0.0))?;
                if raw.fract() != 0.0 || !(1.0..=20.0).contains(&raw) {
                    return Err(RecordError::BadToothPosition(raw));
                }
                Ok(ActivityKind::Tooth { position: raw as u8 })
            }
            "DIAPER" => Ok(ActivityKind::Diaper),
            _ => Err(RecordError::UnknownEntryType(record.entry_type.clone())),
        }
    }

    /// Calendar date of the event (UTC)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Hour of day 0-23 (UTC)
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}
