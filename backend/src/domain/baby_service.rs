//! Baby profile management and the derivation entry points per baby.
//!
//! Profile CRUD plus the orchestration that loads a stored baby, guards
//! the engine's preconditions and hands the result to the caller. The
//! reference date is always a parameter; the only ambient clock use is
//! for audit timestamps on writes.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::age::{self, AgeBreakdown};
use crate::domain::commands::babies::{
    CreateBabyCommand, CreateBabyResult, DeleteBabyCommand, DeleteBabyResult, GetActiveBabyResult,
    GetBabyCommand, GetBabyResult, ListBabiesResult, SetActiveBabyCommand, SetActiveBabyResult,
    UpdateBabyCommand, UpdateBabyResult,
};
use crate::domain::estimates::{self, LifetimeEstimates};
use crate::domain::milestones::MilestoneService;
use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::baby::Baby;
use crate::domain::models::milestone::MilestoneResult;
use crate::domain::pregnancy::{self, PregnancyCountdown};
use crate::domain::stats::{AggregateOutcome, GroupBy, RangeWindow, StatsService};
use crate::domain::teeth::{self, ToothSummary};
use crate::storage::traits::{ActivityStorage, BabyStorage, Connection};

const MAX_NAME_LENGTH: usize = 64;

/// Service for managing babies and deriving their screen data
pub struct BabyService<C: Connection> {
    baby_repository: C::BabyRepository,
    activity_repository: C::ActivityRepository,
    milestone_service: MilestoneService,
    stats_service: StatsService,
}

impl<C: Connection> Clone for BabyService<C>
where
    C::BabyRepository: Clone,
    C::ActivityRepository: Clone,
{
    fn clone(&self) -> Self {
        Self {
            baby_repository: self.baby_repository.clone(),
            activity_repository: self.activity_repository.clone(),
            milestone_service: self.milestone_service.clone(),
            stats_service: self.stats_service.clone(),
        }
    }
}

impl<C: Connection> BabyService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            baby_repository: connection.create_baby_repository(),
            activity_repository: connection.create_activity_repository(),
            milestone_service: MilestoneService::new(),
            stats_service: StatsService::new(),
        }
    }

    /// Create a new baby profile.
    ///
    /// `today` is the caller's reference date; a birthdate after it is
    /// rejected here so the derivation engine never sees an inverted
    /// range.
    pub fn create_baby(
        &self,
        command: CreateBabyCommand,
        today: NaiveDate,
    ) -> Result<CreateBabyResult> {
        info!("Creating baby: name={}, birthdate={}", command.name, command.birthdate);

        let name = Self::validate_name(&command.name)?;
        let birthdate = age::parse_date_only(&command.birthdate)
            .with_context(|| format!("Invalid birthdate: {}", command.birthdate))?;
        if birthdate > today {
            bail!("Birthdate {} is in the future", command.birthdate);
        }
        let due_date = Self::parse_due_date(command.due_date.as_deref())?;

        let now = Utc::now();
        let baby = Baby {
            id: Baby::generate_id(now.timestamp_millis() as u64),
            name,
            birthdate,
            due_date,
            created_at: now,
            updated_at: now,
        };

        self.baby_repository.store_baby(&baby)?;

        info!("Created baby: {} with ID: {}", baby.name, baby.id);
        Ok(CreateBabyResult { baby })
    }

    /// Get a baby by ID
    pub fn get_baby(&self, command: GetBabyCommand) -> Result<GetBabyResult> {
        let baby = self.baby_repository.get_baby(&command.baby_id)?;
        if baby.is_none() {
            warn!("Baby not found: {}", command.baby_id);
        }
        Ok(GetBabyResult { baby })
    }

    /// List all babies
    pub fn list_babies(&self) -> Result<ListBabiesResult> {
        let babies = self.baby_repository.list_babies()?;
        info!("Found {} babies", babies.len());
        Ok(ListBabiesResult { babies })
    }

    /// Update an existing baby profile
    pub fn update_baby(
        &self,
        command: UpdateBabyCommand,
        today: NaiveDate,
    ) -> Result<UpdateBabyResult> {
        info!("Updating baby: {}", command.baby_id);

        let mut baby = self
            .baby_repository
            .get_baby(&command.baby_id)?
            .with_context(|| format!("Baby not found: {}", command.baby_id))?;

        if let Some(name) = command.name {
            baby.name = Self::validate_name(&name)?;
        }
        if let Some(birthdate_str) = command.birthdate {
            let birthdate = age::parse_date_only(&birthdate_str)
                .with_context(|| format!("Invalid birthdate: {}", birthdate_str))?;
            if birthdate > today {
                bail!("Birthdate {} is in the future", birthdate_str);
            }
            baby.birthdate = birthdate;
        }
        if let Some(due_date) = command.due_date {
            baby.due_date = Self::parse_due_date(due_date.as_deref())?;
        }

        baby.updated_at = Utc::now();
        self.baby_repository.update_baby(&baby)?;

        info!("Updated baby: {} with ID: {}", baby.name, baby.id);
        Ok(UpdateBabyResult { baby })
    }

    /// Delete a baby and all of its activity history
    pub fn delete_baby(&self, command: DeleteBabyCommand) -> Result<DeleteBabyResult> {
        self.baby_repository.delete_baby(&command.baby_id)?;
        info!("Deleted baby: {}", command.baby_id);
        Ok(DeleteBabyResult {
            deleted_id: command.baby_id,
        })
    }

    /// Get the active baby, if one is selected
    pub fn get_active_baby(&self) -> Result<GetActiveBabyResult> {
        let baby = match self.baby_repository.get_active_baby()? {
            Some(baby_id) => self.baby_repository.get_baby(&baby_id)?,
            None => None,
        };
        Ok(GetActiveBabyResult { baby })
    }

    /// Set the active baby
    pub fn set_active_baby(&self, command: SetActiveBabyCommand) -> Result<SetActiveBabyResult> {
        self.baby_repository.set_active_baby(&command.baby_id)?;
        let baby = self
            .baby_repository
            .get_baby(&command.baby_id)?
            .with_context(|| format!("Baby not found: {}", command.baby_id))?;
        Ok(SetActiveBabyResult { baby })
    }

    /// Age breakdown for a stored baby; `None` while not yet born
    pub fn age_for(&self, baby_id: &str, today: NaiveDate) -> Result<Option<AgeBreakdown>> {
        let baby = self.require_baby(baby_id)?;
        if !baby.is_born(today) {
            return Ok(None);
        }
        Ok(Some(age::age_breakdown(baby.birthdate, today)))
    }

    /// Evaluated default milestones for a stored baby; `None` while not
    /// yet born
    pub fn milestones_for(
        &self,
        baby_id: &str,
        today: NaiveDate,
    ) -> Result<Option<Vec<MilestoneResult>>> {
        let baby = self.require_baby(baby_id)?;
        if !baby.is_born(today) {
            return Ok(None);
        }
        Ok(Some(
            self.milestone_service.evaluate_default(baby.birthdate, today),
        ))
    }

    /// Lifetime estimates for a stored baby; `None` while not yet born
    pub fn estimates_for(
        &self,
        baby_id: &str,
        today: NaiveDate,
    ) -> Result<Option<LifetimeEstimates>> {
        let baby = self.require_baby(baby_id)?;
        if !baby.is_born(today) {
            return Ok(None);
        }

        let breakdown = age::age_breakdown(baby.birthdate, today);
        Ok(Some(estimates::estimate_aggregates(
            breakdown.total_days,
            breakdown.total_months,
        )))
    }

    /// Pregnancy countdown for a stored baby; `None` without a due date
    pub fn pregnancy_for(
        &self,
        baby_id: &str,
        today: NaiveDate,
    ) -> Result<Option<PregnancyCountdown>> {
        let baby = self.require_baby(baby_id)?;
        Ok(baby.due_date.map(|due| pregnancy::countdown(due, today)))
    }

    /// Aggregated activity statistics for a stored baby
    pub fn stats_for(
        &self,
        baby_id: &str,
        group_by: GroupBy,
        range: RangeWindow,
        anchor: NaiveDate,
    ) -> Result<AggregateOutcome> {
        self.require_baby(baby_id)?;
        let records = self.activity_repository.list_activities(baby_id)?;
        Ok(self.stats_service.aggregate(&records, group_by, range, anchor))
    }

    /// Tooth eruption summary for a stored baby. Invalid rows are skipped
    /// here the same way the aggregator skips them.
    pub fn teeth_for(&self, baby_id: &str) -> Result<ToothSummary> {
        self.require_baby(baby_id)?;
        let records = self.activity_repository.list_activities(baby_id)?;

        let entries: Vec<ActivityEntry> = records
            .iter()
            .filter_map(|record| ActivityEntry::from_record(record).ok())
            .collect();
        Ok(teeth::summarize(&entries))
    }

    fn require_baby(&self, baby_id: &str) -> Result<Baby> {
        self.baby_repository
            .get_baby(baby_id)?
            .with_context(|| format!("Baby not found: {}", baby_id))
    }

    fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            bail!("Baby name must not be empty");
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            bail!("Baby name is too long (max {} characters)", MAX_NAME_LENGTH);
        }
        Ok(trimmed.to_string())
    }

    fn parse_due_date(due_date: Option<&str>) -> Result<Option<NaiveDate>> {
        match due_date {
            Some(raw) => Ok(Some(
                age::parse_date_only(raw).with_context(|| format!("Invalid due date: {}", raw))?,
            )),
            None => Ok(None),
        }
    }
}
