//! File-based activity record repository.
//!
//! One `activities.csv` per baby, living next to the profile. Rows keep
//! the raw `shared::ActivityRecord` shape; validation is the domain
//! layer's job, so a row with a broken timestamp is stored and returned
//! as-is.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use super::baby_repository::BabyRepository;
use super::connection::CsvConnection;
use crate::storage::traits::ActivityStorage;

#[derive(Clone)]
pub struct ActivityRepository {
    baby_repository: BabyRepository,
}

impl ActivityRepository {
    pub fn new(connection: CsvConnection) -> Self {
        let baby_repository = BabyRepository::new(connection);
        Self { baby_repository }
    }

    fn activities_path(&self, baby_id: &str) -> Result<PathBuf> {
        let dir = self
            .baby_repository
            .baby_directory_for_id(baby_id)?
            .with_context(|| format!("Baby not found: {}", baby_id))?;
        Ok(dir.join("activities.csv"))
    }

    fn load_all(&self, baby_id: &str) -> Result<Vec<shared::ActivityRecord>> {
        let path = self.activities_path(baby_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            match row {
                Ok(record) => records.push(record),
                // A corrupt line loses that line, not the whole file
                Err(err) => warn!("Skipping corrupt row in {}: {}", path.display(), err),
            }
        }
        Ok(records)
    }

    /// Rewrite the whole file through a temp file and rename
    fn write_all(&self, baby_id: &str, records: &[shared::ActivityRecord]) -> Result<()> {
        let path = self.activities_path(baby_id)?;
        let tmp_path = path.with_extension("csv.tmp");

        {
            let mut writer = WriterBuilder::new()
                .has_headers(true)
                .from_path(&tmp_path)
                .with_context(|| format!("Failed to open {}", tmp_path.display()))?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn parse_timestamp(record: &shared::ActivityRecord) -> Option<DateTime<Utc>> {
        record
            .start_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    fn sorted_chronological(
        mut records: Vec<shared::ActivityRecord>,
    ) -> Vec<shared::ActivityRecord> {
        // None timestamps sort first; ties keep the raw string order
        records.sort_by_key(|r| (Self::parse_timestamp(r), r.start_time.clone()));
        records
    }
}

impl ActivityStorage for ActivityRepository {
    fn store_activity(&self, record: &shared::ActivityRecord) -> Result<()> {
        let mut records = self.load_all(&record.baby_id)?;
        records.push(record.clone());
        self.write_all(&record.baby_id, &records)?;

        info!(
            "Stored activity {} for baby {}",
            record.id, record.baby_id
        );
        Ok(())
    }

    fn list_activities(&self, baby_id: &str) -> Result<Vec<shared::ActivityRecord>> {
        Ok(Self::sorted_chronological(self.load_all(baby_id)?))
    }

    fn list_activities_between(
        &self,
        baby_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<shared::ActivityRecord>> {
        let records = self.list_activities(baby_id)?;
        if start.is_none() && end.is_none() {
            return Ok(records);
        }

        Ok(records
            .into_iter()
            .filter(|record| match Self::parse_timestamp(record) {
                Some(timestamp) => {
                    let date = timestamp.date_naive();
                    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
                }
                None => false,
            })
            .collect())
    }

    fn get_latest_activity(&self, baby_id: &str) -> Result<Option<shared::ActivityRecord>> {
        let records = self.load_all(baby_id)?;
        Ok(records
            .into_iter()
            .filter_map(|record| Self::parse_timestamp(&record).map(|t| (t, record)))
            .max_by_key(|(timestamp, _)| *timestamp)
            .map(|(_, record)| record))
    }

    fn delete_activity(&self, baby_id: &str, activity_id: &str) -> Result<bool> {
        let mut records = self.load_all(baby_id)?;
        let before = records.len();
        records.retain(|record| record.id != activity_id);

        if records.len() == before {
            return Ok(false);
        }

        self.write_all(baby_id, &records)?;
        info!("Deleted activity {} for baby {}", activity_id, baby_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestHelper;
    use crate::storage::traits::BabyStorage;
    use crate::domain::models::baby::Baby as DomainBaby;
    use chrono::Utc;

    fn store_test_baby(helper: &TestHelper) -> String {
        let now = Utc::now();
        let baby = DomainBaby {
            id: "baby::1".to_string(),
            name: "Mia".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            due_date: None,
            created_at: now,
            updated_at: now,
        };
        helper.baby_repo.store_baby(&baby).unwrap();
        baby.id
    }

    fn record(id: &str, baby_id: &str, start_time: Option<&str>) -> shared::ActivityRecord {
        shared::ActivityRecord {
            id: id.to_string(),
            baby_id: baby_id.to_string(),
            entry_type: "FEEDING".to_string(),
            subtype: Some("BOTTLE".to_string()),
            start_time: start_time.map(str::to_string),
            quantity: Some(120.0),
            note: Some("nach dem Bad, sehr müde".to_string()),
        }
    }

    #[test]
    fn test_store_and_list_round_trip() {
        let helper = TestHelper::new().unwrap();
        let baby_id = store_test_baby(&helper);

        let a = record("activity::feeding::1", &baby_id, Some("2024-03-05T14:30:00Z"));
        let b = record("activity::feeding::2", &baby_id, Some("2024-03-05T08:00:00Z"));
        helper.activity_repo.store_activity(&a).unwrap();
        helper.activity_repo.store_activity(&b).unwrap();

        let listed = helper.activity_repo.list_activities(&baby_id).unwrap();
        assert_eq!(listed.len(), 2);
        // Chronological: b before a
        assert_eq!(listed[0], b);
        assert_eq!(listed[1], a);
    }

    #[test]
    fn test_rows_with_missing_timestamp_survive_round_trip() {
        let helper = TestHelper::new().unwrap();
        let baby_id = store_test_baby(&helper);

        let broken = record("activity::feeding::1", &baby_id, None);
        helper.activity_repo.store_activity(&broken).unwrap();

        let listed = helper.activity_repo.list_activities(&baby_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].start_time, None);
    }

    #[test]
    fn test_list_between_filters_by_date() {
        let helper = TestHelper::new().unwrap();
        let baby_id = store_test_baby(&helper);

        for (id, time) in [
            ("activity::feeding::1", Some("2024-03-01T08:00:00Z")),
            ("activity::feeding::2", Some("2024-03-05T08:00:00Z")),
            ("activity::feeding::3", Some("2024-03-09T08:00:00Z")),
            ("activity::feeding::4", None),
        ] {
            helper
                .activity_repo
                .store_activity(&record(id, &baby_id, time))
                .unwrap();
        }

        let march_2_to_6 = helper
            .activity_repo
            .list_activities_between(
                &baby_id,
                Some(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()),
                Some(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()),
            )
            .unwrap();

        assert_eq!(march_2_to_6.len(), 1);
        assert_eq!(march_2_to_6[0].id, "activity::feeding::2");

        // No bounds returns everything, including the timestampless row
        let all = helper
            .activity_repo
            .list_activities_between(&baby_id, None, None)
            .unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_get_latest_activity() {
        let helper = TestHelper::new().unwrap();
        let baby_id = store_test_baby(&helper);

        assert!(helper.activity_repo.get_latest_activity(&baby_id).unwrap().is_none());

        for (id, time) in [
            ("activity::feeding::1", Some("2024-03-05T08:00:00Z")),
            ("activity::feeding::2", Some("2024-03-05T14:30:00Z")),
            ("activity::feeding::3", None),
        ] {
            helper
                .activity_repo
                .store_activity(&record(id, &baby_id, time))
                .unwrap();
        }

        let latest = helper
            .activity_repo
            .get_latest_activity(&baby_id)
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, "activity::feeding::2");
    }

    #[test]
    fn test_delete_activity() {
        let helper = TestHelper::new().unwrap();
        let baby_id = store_test_baby(&helper);

        let a = record("activity::feeding::1", &baby_id, Some("2024-03-05T08:00:00Z"));
        helper.activity_repo.store_activity(&a).unwrap();

        assert!(helper.activity_repo.delete_activity(&baby_id, &a.id).unwrap());
        assert!(!helper.activity_repo.delete_activity(&baby_id, &a.id).unwrap());
        assert!(helper.activity_repo.list_activities(&baby_id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_baby_is_an_error() {
        let helper = TestHelper::new().unwrap();
        let result = helper.activity_repo.list_activities("baby::404");
        assert!(result.is_err());
    }
}
