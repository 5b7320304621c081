//! Test utilities for storage tests
//!
//! The temporary data directory is removed when the environment is dropped,
//! even if the test panics.

use anyhow::Result;
use tempfile::TempDir;

use super::connection::DataConnection;

pub struct TestEnvironment {
    pub connection: DataConnection,
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = DataConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}
