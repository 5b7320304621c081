//! Backend: the school state plus everything needed to load, save and
//! export it.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use domain::{ExportService, SchoolService};
use storage::{DataConnection, SchoolSettings, SchoolStore, SettingsRepository};

pub struct Backend {
    pub connection: DataConnection,
    pub settings: SchoolSettings,
    pub school: SchoolService,
    store: SchoolStore,
    export_service: ExportService,
}

impl Backend {
    /// Load settings (creating them on first run) and all four registries
    pub fn open(connection: DataConnection) -> Result<Self> {
        let settings = SettingsRepository::new(connection.clone())
            .load_or_create()
            .context("Failed to load settings")?;

        let store = SchoolStore::new(connection.clone());
        let state = store
            .load_all(settings.max_records)
            .context("Failed to load school data")?;
        info!("Opened data directory {}", connection.base_directory().display());

        Ok(Self {
            export_service: ExportService::new(connection.clone()),
            connection,
            settings,
            school: SchoolService::new(state),
            store,
        })
    }

    pub fn save(&self) -> Result<()> {
        self.store.save_all(self.school.state())
    }

    pub fn export_report(&self) -> Result<PathBuf> {
        self.export_service.export_report(
            self.school.state(),
            &self.settings.report_file,
            self.settings.extra_hour_rate,
        )
    }

    pub fn export_payment_summary(&self) -> Result<PathBuf> {
        self.export_service.export_payment_summary(
            self.school.state(),
            &self.settings.payments_csv_file,
            self.settings.extra_hour_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::students::EnrollStudentCommand;
    use crate::backend::storage::binary::test_utils::TestEnvironment;
    use shared::LicenseCategory;

    #[test]
    fn test_open_save_reopen() {
        let env = TestEnvironment::new().unwrap();

        let mut backend = Backend::open(env.connection.clone()).unwrap();
        assert!(backend.school.state().students.is_empty());
        backend
            .school
            .enroll_student(EnrollStudentCommand {
                first_name: "Mario".into(),
                last_name: "Rossi".into(),
                fiscal_code: "RSSMRA85T10A562S".into(),
                category: LicenseCategory::B,
            })
            .unwrap();
        backend.save().unwrap();

        let reopened = Backend::open(env.connection.clone()).unwrap();
        let state = reopened.school.state();
        assert_eq!(state.students.len(), 1);
        assert_eq!(state.payments.get(1).unwrap().first, 250.0);
        assert_eq!(state.students.next_id(), 2);
    }

    #[test]
    fn test_exports_use_configured_file_names() {
        let env = TestEnvironment::new().unwrap();
        let backend = Backend::open(env.connection.clone()).unwrap();

        let report = backend.export_report().unwrap();
        let csv = backend.export_payment_summary().unwrap();
        assert_eq!(report, env.base_path.join("student_report.txt"));
        assert_eq!(csv, env.base_path.join("payment_summary.csv"));
    }
}
