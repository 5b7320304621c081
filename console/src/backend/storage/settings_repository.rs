//! # Settings Repository
//!
//! School-wide settings kept in `autoscuola.yaml` at the root of the data
//! directory:
//!
//! ```yaml
//! max_records: 100
//! extra_hour_rate: 15.0
//! report_file: student_report.txt
//! payments_csv_file: payment_summary.csv
//! ```
//!
//! The file is created with defaults on first run. Fields missing from an
//! existing file fall back to their defaults.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::binary::DataConnection;

pub const SETTINGS_FILE: &str = "autoscuola.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSettings {
    /// Capacity of each of the four registries
    pub max_records: usize,
    /// Price of one drive hour beyond the mandatory minimum
    pub extra_hour_rate: f64,
    pub report_file: String,
    pub payments_csv_file: String,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            max_records: 100,
            extra_hour_rate: 15.0,
            report_file: "student_report.txt".to_string(),
            payments_csv_file: "payment_summary.csv".to_string(),
        }
    }
}

impl SchoolSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_records == 0 {
            bail!("max_records must be greater than zero");
        }
        if !self.extra_hour_rate.is_finite() || self.extra_hour_rate < 0.0 {
            bail!("extra_hour_rate must be a non-negative number, got {}", self.extra_hour_rate);
        }
        if self.report_file.trim().is_empty() || self.payments_csv_file.trim().is_empty() {
            bail!("export file names cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    connection: DataConnection,
}

impl SettingsRepository {
    pub fn new(connection: DataConnection) -> Self {
        Self { connection }
    }

    fn settings_path(&self) -> PathBuf {
        self.connection.file_path(SETTINGS_FILE)
    }

    /// Load settings from file, creating the default file if it doesn't exist
    pub fn load_or_create(&self) -> Result<SchoolSettings> {
        let path = self.settings_path();

        if path.exists() {
            let yaml_content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let settings: SchoolSettings = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid settings in {}", path.display()))?;
            settings
                .validate()
                .with_context(|| format!("Invalid settings in {}", path.display()))?;
            debug!("Loaded settings from {}", path.display());
            Ok(settings)
        } else {
            let settings = SchoolSettings::default();
            self.save(&settings)?;
            info!("Created default settings at {}", path.display());
            Ok(settings)
        }
    }

    pub fn save(&self, settings: &SchoolSettings) -> Result<()> {
        let yaml_content = serde_yaml::to_string(settings)?;
        self.connection.write_atomic(SETTINGS_FILE, yaml_content.as_bytes())
    }
}
