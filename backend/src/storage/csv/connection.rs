//! Connection handle for the file-based storage backend.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ActivityRepository, BabyRepository};
use crate::storage::traits::Connection;

/// Handle to the base data directory. Cheap to clone; repositories are
/// created per use, mirroring how a pooled database connection would work.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open (and create if needed) the base data directory
    pub fn new(base_directory: impl AsRef<Path>) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        fs::create_dir_all(&base_directory).with_context(|| {
            format!("Failed to create data directory {}", base_directory.display())
        })?;

        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a baby's directory for a given safe directory name
    pub fn baby_directory(&self, directory_name: &str) -> PathBuf {
        self.base_directory.join(directory_name)
    }

    /// Create a baby's directory if it does not exist yet
    pub fn ensure_baby_directory(&self, directory_name: &str) -> Result<PathBuf> {
        let path = self.baby_directory(directory_name);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create baby directory {}", path.display()))?;
        Ok(path)
    }
}

impl Connection for CsvConnection {
    type BabyRepository = BabyRepository;
    type ActivityRepository = ActivityRepository;

    fn create_baby_repository(&self) -> BabyRepository {
        BabyRepository::new(self.clone())
    }

    fn create_activity_repository(&self) -> ActivityRepository {
        ActivityRepository::new(self.clone())
    }
}
