//! # File-based storage
//!
//! One directory per baby under a base data directory:
//!
//! ```text
//! <base>/
//!   global_config.yaml        active baby pointer
//!   mia/
//!     baby.yaml               profile
//!     activities.csv          activity records
//!   emil/
//!     ...
//! ```
//!
//! Profiles are YAML for hand-editability; activity records are CSV with
//! the raw `shared::ActivityRecord` shape:
//!
//! ```csv
//! id,baby_id,entry_type,subtype,start_time,quantity,note
//! activity::feeding::1702516122000,baby::1700000000000,FEEDING,BOTTLE,2023-12-14T01:02:02Z,120.0,
//! ```
//!
//! All mutations rewrite through a temp file and rename, so a crash never
//! leaves a half-written file behind.

pub mod activity_repository;
pub mod baby_repository;
pub mod connection;

#[cfg(test)]
pub mod test_utils;

pub use activity_repository::ActivityRepository;
pub use baby_repository::BabyRepository;
pub use connection::CsvConnection;
