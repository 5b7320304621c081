//! Export service: writes the full student report and the payment summary
//! into the data directory.

use anyhow::{Context, Result};
use csv::Writer;
use log::info;
use std::path::PathBuf;

use crate::backend::domain::report_service;
use crate::backend::domain::school_service::SchoolState;
use crate::backend::storage::binary::DataConnection;

#[derive(Debug, Clone)]
pub struct ExportService {
    connection: DataConnection,
}

impl ExportService {
    pub fn new(connection: DataConnection) -> Self {
        Self { connection }
    }

    /// Write the per-student text report and return its path
    pub fn export_report(&self, state: &SchoolState, file_name: &str, extra_hour_rate: f64) -> Result<PathBuf> {
        let report = report_service::render_full_report(state, extra_hour_rate)?;
        self.connection
            .write_atomic(file_name, report.as_bytes())
            .context("Failed to export student report")?;

        let path = self.connection.file_path(file_name);
        info!("Exported report for {} students to {}", state.students.len(), path.display());
        Ok(path)
    }

    /// Write the payment summary as CSV, one row per payment record
    pub fn export_payment_summary(&self, state: &SchoolState, file_name: &str, extra_hour_rate: f64) -> Result<PathBuf> {
        let rows = report_service::payment_summary(state, extra_hour_rate);

        let mut writer = Writer::from_writer(Vec::new());
        for row in &rows {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().context("Failed to finish CSV output")?;

        self.connection
            .write_atomic(file_name, &bytes)
            .context("Failed to export payment summary")?;

        let path = self.connection.file_path(file_name);
        info!("Exported {} payment rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::students::EnrollStudentCommand;
    use crate::backend::domain::school_service::SchoolService;
    use crate::backend::storage::binary::test_utils::TestEnvironment;
    use shared::LicenseCategory;
    use std::fs;

    fn state() -> SchoolState {
        let mut service = SchoolService::with_capacity(5);
        service
            .enroll_student(EnrollStudentCommand {
                first_name: "Mario".into(),
                last_name: "Rossi".into(),
                fiscal_code: "RSSMRA85T10A562S".into(),
                category: LicenseCategory::A,
            })
            .unwrap();
        service.into_state()
    }

    #[test]
    fn test_export_report() {
        let env = TestEnvironment::new().unwrap();
        let service = ExportService::new(env.connection.clone());

        let path = service.export_report(&state(), "report.txt", 15.0).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("| Name: Mario Rossi"));
        assert!(text.contains("[OUTCOME]"));
    }

    #[test]
    fn test_export_payment_summary_csv() {
        let env = TestEnvironment::new().unwrap();
        let service = ExportService::new(env.connection.clone());

        let path = service.export_payment_summary(&state(), "payments.csv", 15.0).unwrap();
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "student_id");
        assert_eq!(&headers[6], "complete");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "Rossi");
        assert_eq!(&rows[0][3], "250.0");
        assert_eq!(&rows[0][6], "false");
    }
}
