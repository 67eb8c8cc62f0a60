use serde::{Deserialize, Serialize};
use std::fmt;

/// Baby ID in format: "baby::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub id: String,
    /// Display name of the baby
    pub name: String,
    /// Birth date in ISO 8601 date format (YYYY-MM-DD)
    pub birthdate: String,
    /// Estimated due date (YYYY-MM-DD), kept after birth for pregnancy history
    pub due_date: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// Raw activity row as delivered by the backing store.
///
/// Deliberately loose: every field the derivation engine cares about is
/// optional or stringly typed, because rows arrive unvalidated. The backend
/// crate parses these into a typed entry at its boundary and skips rows
/// that fail, so one malformed record never blanks a whole chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    /// ID of the baby this record belongs to
    pub baby_id: String,
    /// Record category, e.g. "FEEDING", "SLEEP", "GROWTH", "TOOTH", "DIAPER"
    pub entry_type: String,
    /// Sub-type within the category, e.g. "BREAST" / "BOTTLE" / "SOLIDS"
    pub subtype: Option<String>,
    /// RFC 3339 timestamp of the event
    pub start_time: Option<String>,
    /// Numeric quantity: ml for feedings, kg/cm for growth, tooth position
    pub quantity: Option<f64>,
    pub note: Option<String>,
}

/// Request for creating a new baby profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBabyRequest {
    pub name: String,
    pub birthdate: String, // ISO 8601 date format (YYYY-MM-DD)
    pub due_date: Option<String>,
}

/// Request for updating an existing baby profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBabyRequest {
    pub name: Option<String>,
    pub birthdate: Option<String>, // ISO 8601 date format (YYYY-MM-DD)
    pub due_date: Option<String>,
}

/// Response after creating or updating a baby
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BabyResponse {
    pub baby: Baby,
    pub success_message: String,
}

/// Response containing a list of babies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BabyListResponse {
    pub babies: Vec<Baby>,
}

/// Request for setting the active baby
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetActiveBabyRequest {
    pub baby_id: String,
}

/// Response after setting the active baby
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetActiveBabyResponse {
    pub success_message: String,
    pub active_baby: Baby,
}

/// Response containing the active baby, if one is selected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveBabyResponse {
    pub active_baby: Option<Baby>,
}

/// Calendar-aware age breakdown for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgeBreakdownDto {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub total_months: i32,
}

/// One evaluated milestone for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilestoneResultDto {
    pub name: String,
    pub reached: bool,
    /// Target date (YYYY-MM-DD) the milestone falls on
    pub date: Option<String>,
}

/// Illustrative lifetime totals derived from elapsed days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifetimeEstimatesDto {
    pub heartbeats: u64,
    pub breaths: u64,
    pub diapers: u64,
    pub sleep_hours: u64,
}

/// Count of activity entries per kind label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KindCountDto {
    pub kind: String,
    pub count: u32,
}

/// One point of a day/month chart series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPointDto {
    /// Bucket date (YYYY-MM-DD); first of the month for monthly buckets
    pub date: String,
    pub value: f64,
}

/// Aggregated activity statistics for display.
///
/// All values are raw numbers and ISO strings; locale formatting (number
/// separators, weekday names) is the consuming frontend's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshotDto {
    pub total: u32,
    pub by_kind: Vec<KindCountDto>,
    pub quantity_sum: f64,
    /// RFC 3339 timestamp of the earliest entry in range
    pub first: Option<String>,
    /// RFC 3339 timestamp of the latest entry in range
    pub last: Option<String>,
    /// Entry counts per hour of day, index 0-23
    pub hour_distribution: Vec<u32>,
    /// Chart series; empty means "not enough data to chart"
    pub series: Vec<SeriesPointDto>,
    /// Rows dropped during validation (bad timestamp, unknown type, ...)
    pub skipped: u32,
}

/// Pregnancy countdown values for the due-date screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PregnancyCountdownDto {
    /// Days until the due date; negative once overdue
    pub days_remaining: i64,
    /// 1-based week of pregnancy, capped at 42
    pub week: u32,
    pub trimester: u8,
    /// Fraction of the 280-day term elapsed, 0.0..=1.0
    pub progress: f64,
}

impl Baby {
    /// Generate a baby ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("baby::{}", epoch_millis)
    }

    /// Parse a baby ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, BabyIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "baby" {
            return Err(BabyIdError::InvalidFormat);
        }

        parts[1].parse::<u64>().map_err(|_| BabyIdError::InvalidTimestamp)
    }

    /// Extract timestamp from baby ID
    pub fn extract_timestamp(&self) -> Result<u64, BabyIdError> {
        Self::parse_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BabyIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for BabyIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BabyIdError::InvalidFormat => write!(f, "Invalid baby ID format"),
            BabyIdError::InvalidTimestamp => write!(f, "Invalid timestamp in baby ID"),
        }
    }
}

impl std::error::Error for BabyIdError {}

impl ActivityRecord {
    /// Generate an activity ID from its entry type and timestamp
    pub fn generate_id(entry_type: &str, epoch_millis: u64) -> String {
        format!("activity::{}::{}", entry_type.to_lowercase(), epoch_millis)
    }

    /// Parse an activity ID to extract the entry type and timestamp
    pub fn parse_id(id: &str) -> Result<(String, u64), ActivityIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "activity" {
            return Err(ActivityIdError::InvalidFormat);
        }

        let entry_type = parts[1];
        if entry_type.is_empty() {
            return Err(ActivityIdError::InvalidEntryType);
        }

        let epoch_millis = parts[2]
            .parse::<u64>()
            .map_err(|_| ActivityIdError::InvalidTimestamp)?;

        Ok((entry_type.to_string(), epoch_millis))
    }

    /// Extract epoch timestamp from activity ID for sorting
    pub fn extract_timestamp(&self) -> Result<u64, ActivityIdError> {
        Self::parse_id(&self.id).map(|(_, timestamp)| timestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityIdError {
    InvalidFormat,
    InvalidEntryType,
    InvalidTimestamp,
}

impl fmt::Display for ActivityIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityIdError::InvalidFormat => write!(f, "Invalid activity ID format"),
            ActivityIdError::InvalidEntryType => write!(f, "Invalid entry type in activity ID"),
            ActivityIdError::InvalidTimestamp => write!(f, "Invalid timestamp in activity ID"),
        }
    }
}

impl std::error::Error for ActivityIdError {}
