use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// DataConnection resolves the data directory that holds the `.dat` files,
/// the settings file and the exported reports
#[derive(Debug, Clone)]
pub struct DataConnection {
    base_directory: PathBuf,
}

impl DataConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Data files live next to the working directory. When that cannot be
    /// resolved, fall back to `~/Documents/Autoscuola`.
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Could not resolve working directory ({}), using documents directory", e);
                dirs::document_dir()
                    .or_else(dirs::home_dir)
                    .map(|dir| dir.join("Autoscuola"))
                    .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?
            }
        };

        debug!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Write to a temp file next to the target, then rename over it
    pub fn write_atomic(&self, file_name: &str, contents: &[u8]) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move {} into place", path.display()))?;

        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}
