//! Domain model for a baby profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::age;

/// Domain model representing a baby in the system.
/// Dates are typed here; the stringly-typed rendering lives in the shared DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub id: String,
    pub name: String,
    pub birthdate: NaiveDate,
    /// Estimated due date, kept after birth for pregnancy history
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Baby {
    /// Generate a unique ID for a baby
    pub fn generate_id(timestamp_millis: u64) -> String {
        shared::Baby::generate_id(timestamp_millis)
    }

    /// Convert to the shared DTO for the presentation boundary
    pub fn to_dto(&self) -> shared::Baby {
        shared::Baby {
            id: self.id.clone(),
            name: self.name.clone(),
            birthdate: age::format_date_only(self.birthdate),
            due_date: self.due_date.map(age::format_date_only),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }

    /// Whether the baby has been born as of the given date.
    /// The derivation engine requires `birthdate <= today`; callers use this
    /// guard and render a "not yet born" state instead.
    pub fn is_born(&self, today: NaiveDate) -> bool {
        self.birthdate <= today
    }
}
