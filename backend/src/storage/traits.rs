//! # Storage Traits
//!
//! Storage abstraction traits that let different backends be used
//! interchangeably in the domain layer. All operations are synchronous;
//! the tracker is an embedded desktop backend, not a server.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::baby::Baby as DomainBaby;

/// Interface for baby profile storage operations
pub trait BabyStorage: Send + Sync {
    /// Store a new baby profile
    fn store_baby(&self, baby: &DomainBaby) -> Result<()>;

    /// Retrieve a specific baby by ID
    fn get_baby(&self, baby_id: &str) -> Result<Option<DomainBaby>>;

    /// List all babies ordered by name
    fn list_babies(&self) -> Result<Vec<DomainBaby>>;

    /// Update an existing baby profile
    fn update_baby(&self, baby: &DomainBaby) -> Result<()>;

    /// Delete a baby by ID, including all of its activity history
    fn delete_baby(&self, baby_id: &str) -> Result<()>;

    /// Get the currently active baby ID
    fn get_active_baby(&self) -> Result<Option<String>>;

    /// Set the currently active baby
    fn set_active_baby(&self, baby_id: &str) -> Result<()>;
}

/// Interface for activity record storage operations.
///
/// Activity rows are stored and returned in their raw `shared` shape; the
/// domain layer validates them at its own boundary, which keeps the store
/// faithful to whatever the syncing backend delivered.
pub trait ActivityStorage: Send + Sync {
    /// Store a new activity record
    fn store_activity(&self, record: &shared::ActivityRecord) -> Result<()>;

    /// List all records for a baby in chronological order.
    /// Records without a parseable timestamp sort first.
    fn list_activities(&self, baby_id: &str) -> Result<Vec<shared::ActivityRecord>>;

    /// List records whose calendar date falls within the inclusive bounds.
    /// Records without a parseable timestamp are excluded when a bound is
    /// set.
    fn list_activities_between(
        &self,
        baby_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<shared::ActivityRecord>>;

    /// Get the chronologically latest record for a baby
    fn get_latest_activity(&self, baby_id: &str) -> Result<Option<shared::ActivityRecord>>;

    /// Delete a single record.
    /// Returns true if the record was found and deleted, false otherwise.
    fn delete_activity(&self, baby_id: &str, activity_id: &str) -> Result<bool>;
}

/// Factory trait for storage connections.
///
/// Abstracts the concrete backend (file tree, SQL, ...) so the domain
/// layer can be wired against any implementation.
pub trait Connection: Send + Sync + Clone {
    /// The type of BabyStorage this connection creates
    type BabyRepository: BabyStorage;

    /// The type of ActivityStorage this connection creates
    type ActivityRepository: ActivityStorage;

    /// Create a new baby repository for this connection
    fn create_baby_repository(&self) -> Self::BabyRepository;

    /// Create a new activity repository for this connection
    fn create_activity_repository(&self) -> Self::ActivityRepository;
}
