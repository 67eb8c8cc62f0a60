/// Test utilities for consistent storage test infrastructure.
///
/// RAII-based cleanup guarantees test data is removed even if tests panic
/// or fail.
use anyhow::Result;
use tempfile::TempDir;

use super::activity_repository::ActivityRepository;
use super::baby_repository::BabyRepository;
use super::connection::CsvConnection;

/// Temporary data directory plus a connection into it; cleaned up on drop.
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// Repository bundle over a fresh test environment
pub struct TestHelper {
    pub env: TestEnvironment,
    pub baby_repo: BabyRepository,
    pub activity_repo: ActivityRepository,
}

impl TestHelper {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        let baby_repo = BabyRepository::new(env.connection.clone());
        let activity_repo = ActivityRepository::new(env.connection.clone());

        Ok(Self {
            env,
            baby_repo,
            activity_repo,
        })
    }
}
