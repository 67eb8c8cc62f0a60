//! # Babysteps Backend
//!
//! Embedded backend for the Babysteps baby tracker. Frontends link this
//! crate directly and talk to domain services over plain function calls:
//! - Synchronous operations throughout, no async runtime
//! - Derivation services (age, milestones, estimates, statistics,
//!   pregnancy countdown, tooth summary) that take their reference date
//!   as a parameter
//! - File-based storage behind repository traits, with a staleness cache
//!   in front of profile loads

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::csv::CsvConnection;

use storage::cache::CachedBabyStore;
use storage::csv::BabyRepository;
use storage::traits::Connection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub baby_service: domain::BabyService<CsvConnection>,
    pub milestone_service: domain::MilestoneService,
    pub stats_service: domain::StatsService,
    /// Cached profile loads for screens that re-read on every frame
    pub baby_cache: CachedBabyStore<BabyRepository>,
}

impl Backend {
    /// Create a new backend instance rooted at the given data directory
    pub fn new(data_directory: impl AsRef<Path>) -> Result<Self> {
        let connection = Arc::new(CsvConnection::new(data_directory)?);

        let baby_service = domain::BabyService::new(connection.clone());
        let baby_cache = CachedBabyStore::new(connection.create_baby_repository());

        Ok(Backend {
            baby_service,
            milestone_service: domain::MilestoneService::new(),
            stats_service: domain::StatsService::new(),
            baby_cache,
        })
    }
}
