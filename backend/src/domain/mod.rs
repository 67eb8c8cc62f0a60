//! Domain layer: validated models and the derivation services.
//!
//! Everything in here is synchronous and free of I/O except the services
//! that explicitly orchestrate a repository. The pure modules (`age`,
//! `milestones`, `estimates`, `stats`, `pregnancy`, `teeth`) take their
//! reference date as a parameter and are safe to call from anywhere.

pub mod age;
pub mod baby_service;
pub mod commands;
pub mod estimates;
pub mod milestones;
pub mod models;
pub mod pregnancy;
pub mod stats;
pub mod teeth;

pub use baby_service::BabyService;
pub use milestones::MilestoneService;
pub use stats::StatsService;
