//! Persistence coordinator: loads the four registries at startup and writes
//! them back on save.

use anyhow::{anyhow, Context, Result};
use log::{error, info};

use super::binary::{DataConnection, DriveHoursRepository, ExamRepository, PaymentRepository, StudentRepository};
use super::traits::RecordStorage;
use crate::backend::domain::drive_hours_tracker::DriveHoursTracker;
use crate::backend::domain::exam_tracker::ExamTracker;
use crate::backend::domain::models::drive_hours::DriveHours;
use crate::backend::domain::models::exam::Exam;
use crate::backend::domain::models::payment::Payment;
use crate::backend::domain::models::student::Student;
use crate::backend::domain::payment_ledger::PaymentLedger;
use crate::backend::domain::school_service::SchoolState;
use crate::backend::domain::student_registry::StudentRegistry;

pub struct SchoolStore {
    students: Box<dyn RecordStorage<Student>>,
    payments: Box<dyn RecordStorage<Payment>>,
    exams: Box<dyn RecordStorage<Exam>>,
    drive_hours: Box<dyn RecordStorage<DriveHours>>,
}

impl SchoolStore {
    /// Binary files in the connection's data directory
    pub fn new(connection: DataConnection) -> Self {
        Self::with_storages(
            Box::new(StudentRepository::new(connection.clone())),
            Box::new(PaymentRepository::new(connection.clone())),
            Box::new(ExamRepository::new(connection.clone())),
            Box::new(DriveHoursRepository::new(connection)),
        )
    }

    pub fn with_storages(
        students: Box<dyn RecordStorage<Student>>,
        payments: Box<dyn RecordStorage<Payment>>,
        exams: Box<dyn RecordStorage<Exam>>,
        drive_hours: Box<dyn RecordStorage<DriveHours>>,
    ) -> Self {
        Self {
            students,
            payments,
            exams,
            drive_hours,
        }
    }

    /// Missing files load as empty registries. Students come back sorted
    /// with the next ID recomputed.
    pub fn load_all(&self, capacity: usize) -> Result<SchoolState> {
        let students = self.students.load_records()?.unwrap_or_default();
        let payments = self.payments.load_records()?.unwrap_or_default();
        let exams = self.exams.load_records()?.unwrap_or_default();
        let drive_hours = self.drive_hours.load_records()?.unwrap_or_default();

        let state = SchoolState {
            students: StudentRegistry::from_records(students, capacity)
                .with_context(|| format!("Cannot load {}", self.students.location()))?,
            payments: PaymentLedger::from_records(payments, capacity)
                .with_context(|| format!("Cannot load {}", self.payments.location()))?,
            exams: ExamTracker::from_records(exams, capacity)
                .with_context(|| format!("Cannot load {}", self.exams.location()))?,
            drive_hours: DriveHoursTracker::from_records(drive_hours, capacity)
                .with_context(|| format!("Cannot load {}", self.drive_hours.location()))?,
        };

        info!(
            "Loaded {} students, {} payments, {} exam records, {} drive-hour records",
            state.students.len(),
            state.payments.len(),
            state.exams.len(),
            state.drive_hours.len()
        );
        Ok(state)
    }

    /// Writes every registry even when an earlier one fails; the error lists
    /// all files that could not be written.
    pub fn save_all(&self, state: &SchoolState) -> Result<()> {
        let outcomes = [
            (self.students.location(), self.students.save_records(state.students.students())),
            (self.payments.location(), self.payments.save_records(state.payments.payments())),
            (self.exams.location(), self.exams.save_records(state.exams.exams())),
            (self.drive_hours.location(), self.drive_hours.save_records(state.drive_hours.records())),
        ];

        let mut failed = Vec::new();
        for (location, outcome) in outcomes {
            if let Err(e) = outcome {
                error!("Failed to save {}: {:#}", location, e);
                failed.push(location);
            }
        }

        if failed.is_empty() {
            info!("Saved all registries");
            Ok(())
        } else {
            Err(anyhow!("Failed to save {}", failed.join(", ")))
        }
    }
}
