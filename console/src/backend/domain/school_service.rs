//! Consistency rules that couple the four registries.
//!
//! Each rule is a free function taking the registries it touches, so the
//! set of collections an event can mutate is visible at the call site.
//! Multi-step rules apply their steps in order and never roll back: a
//! failing step is logged and reported, the steps before it stay applied.

use log::{info, warn};
use shared::{EligibilityBreakdown, StudentId, StudentStatus};

use crate::backend::domain::commands::drive_hours::AddDriveHoursCommand;
use crate::backend::domain::commands::exams::{
    ExamAttemptResult, PenaltyKind, PenaltyReport, RecordExamAttemptCommand,
};
use crate::backend::domain::commands::payments::RegisterInstallmentCommand;
use crate::backend::domain::commands::students::{EnrollStudentCommand, EnrollStudentResult};
use crate::backend::domain::drive_hours_tracker::DriveHoursTracker;
use crate::backend::domain::exam_tracker::ExamTracker;
use crate::backend::domain::models::drive_hours::DriveHours;
use crate::backend::domain::models::errors::{ExamError, RegistryError};
use crate::backend::domain::models::exam::{AttemptRecord, MAX_ATTEMPTS};
use crate::backend::domain::payment_ledger::PaymentLedger;
use crate::backend::domain::student_registry::StudentRegistry;

/// The four registries of a running school
#[derive(Debug, Clone)]
pub struct SchoolState {
    pub students: StudentRegistry,
    pub payments: PaymentLedger,
    pub exams: ExamTracker,
    pub drive_hours: DriveHoursTracker,
}

impl SchoolState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            students: StudentRegistry::new(capacity),
            payments: PaymentLedger::new(capacity),
            exams: ExamTracker::new(capacity),
            drive_hours: DriveHoursTracker::new(capacity),
        }
    }
}

/// Enroll a student, create the companion records, then re-sort the registry.
///
/// Only the student insert can fail the call. A companion record that
/// cannot be created is listed in `uninitialized`.
pub fn enroll_student(
    students: &mut StudentRegistry,
    payments: &mut PaymentLedger,
    exams: &mut ExamTracker,
    drive_hours: &mut DriveHoursTracker,
    command: EnrollStudentCommand,
) -> Result<EnrollStudentResult, RegistryError> {
    let student_id = students.enroll(command)?;
    let mut uninitialized = Vec::new();

    if let Err(e) = payments.initialize(student_id) {
        warn!("Student {} enrolled without a payment record: {}", student_id, e);
        uninitialized.push("payment");
    }
    if let Err(e) = exams.initialize(student_id) {
        warn!("Student {} enrolled without an exam record: {}", student_id, e);
        uninitialized.push("exam");
    }
    if let Err(e) = drive_hours.initialize(student_id) {
        warn!("Student {} enrolled without a drive-hours record: {}", student_id, e);
        uninitialized.push("drive hours");
    }

    students.sort_alphabetical();
    Ok(EnrollStudentResult {
        student_id,
        uninitialized,
    })
}

/// Record a theory attempt; a second failure suspends the student and
/// puts the first installment back to the enrollment fee.
pub fn record_theory_attempt(
    exams: &mut ExamTracker,
    students: &mut StudentRegistry,
    payments: &mut PaymentLedger,
    command: RecordExamAttemptCommand,
) -> Result<ExamAttemptResult, ExamError> {
    let student_id = command.student_id;
    let attempt = exams.record_theory_attempt(student_id, command.outcome, command.date)?;

    let penalty = if triggers_penalty(&attempt) {
        warn!("Student {} failed theory twice, applying suspension", student_id);
        let status_updated = log_step(
            student_id,
            "status update",
            students.set_status(student_id, StudentStatus::Suspended),
        );
        let installments_reset = log_step(
            student_id,
            "first installment reset",
            payments.reset_first_installment(student_id),
        );
        Some(PenaltyReport {
            kind: PenaltyKind::Suspension,
            status_updated,
            installments_reset,
        })
    } else {
        None
    };

    Ok(ExamAttemptResult { attempt, penalty })
}

/// Record a practical attempt using the hours logged for the student; a
/// second failure puts all three installments back to the enrollment fee.
pub fn record_practical_attempt(
    exams: &mut ExamTracker,
    payments: &mut PaymentLedger,
    drive_hours: &DriveHoursTracker,
    command: RecordExamAttemptCommand,
) -> Result<ExamAttemptResult, ExamError> {
    let student_id = command.student_id;
    let hours_completed = drive_hours.total_hours(student_id);
    let attempt =
        exams.record_practical_attempt(student_id, command.outcome, command.date, hours_completed)?;

    let penalty = if triggers_penalty(&attempt) {
        warn!("Student {} failed the practical exam twice, resetting installments", student_id);
        let installments_reset = log_step(
            student_id,
            "installment reset",
            payments.reset_all_installments(student_id),
        );
        Some(PenaltyReport {
            kind: PenaltyKind::FullRepayment,
            status_updated: false,
            installments_reset,
        })
    } else {
        None
    };

    Ok(ExamAttemptResult { attempt, penalty })
}

fn triggers_penalty(attempt: &AttemptRecord) -> bool {
    !attempt.passed && attempt.attempt_number == MAX_ATTEMPTS
}

fn log_step(student_id: StudentId, step: &str, outcome: Result<(), RegistryError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            warn!("Penalty step '{}' for student {} not applied: {}", step, student_id, e);
            false
        }
    }
}

/// Computed at report time, never stored
pub fn assess_eligibility(
    exams: &ExamTracker,
    payments: &PaymentLedger,
    drive_hours: &DriveHoursTracker,
    student_id: StudentId,
) -> EligibilityBreakdown {
    let exam = exams.get(student_id);
    EligibilityBreakdown {
        theory_passed: exam.is_some_and(|exam| exam.theory.passed),
        practical_passed: exam.is_some_and(|exam| exam.practical.passed),
        installments_complete: payments
            .get(student_id)
            .is_some_and(|payment| payment.installments_complete()),
        drive_hours_complete: drive_hours.meets_minimum(student_id),
    }
}

/// Owns the school state and routes user actions through the rules above
#[derive(Debug, Clone)]
pub struct SchoolService {
    state: SchoolState,
}

impl SchoolService {
    pub fn new(state: SchoolState) -> Self {
        Self { state }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(SchoolState::with_capacity(capacity))
    }

    pub fn state(&self) -> &SchoolState {
        &self.state
    }

    pub fn into_state(self) -> SchoolState {
        self.state
    }

    pub fn enroll_student(&mut self, command: EnrollStudentCommand) -> Result<EnrollStudentResult, RegistryError> {
        let state = &mut self.state;
        enroll_student(
            &mut state.students,
            &mut state.payments,
            &mut state.exams,
            &mut state.drive_hours,
            command,
        )
    }

    pub fn register_installment(&mut self, command: RegisterInstallmentCommand) -> Result<(), RegistryError> {
        self.require_student(command.student_id)?;
        self.state
            .payments
            .set_installment(command.student_id, command.slot, command.amount)
    }

    pub fn record_theory_attempt(&mut self, command: RecordExamAttemptCommand) -> Result<ExamAttemptResult, ExamError> {
        let state = &mut self.state;
        record_theory_attempt(&mut state.exams, &mut state.students, &mut state.payments, command)
    }

    pub fn record_practical_attempt(
        &mut self,
        command: RecordExamAttemptCommand,
    ) -> Result<ExamAttemptResult, ExamError> {
        let state = &mut self.state;
        record_practical_attempt(&mut state.exams, &mut state.payments, &state.drive_hours, command)
    }

    pub fn add_drive_hours(&mut self, command: AddDriveHoursCommand) -> Result<DriveHours, RegistryError> {
        self.require_student(command.student_id)?;
        let record = self.state.drive_hours.add_hours(command.student_id, command.hours)?;
        Ok(record.clone())
    }

    pub fn eligibility(&self, student_id: StudentId) -> EligibilityBreakdown {
        assess_eligibility(
            &self.state.exams,
            &self.state.payments,
            &self.state.drive_hours,
            student_id,
        )
    }

    fn require_student(&self, student_id: StudentId) -> Result<(), RegistryError> {
        if self.state.students.find_by_id(student_id).is_none() {
            info!("Rejected action for unknown student {}", student_id);
            return Err(RegistryError::NotFound {
                registry: "student",
                id: student_id,
            });
        }
        Ok(())
    }
}
