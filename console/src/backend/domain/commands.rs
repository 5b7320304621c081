// console/src/backend/domain/commands.rs

//! Domain-level command and result types.
//! The console layer builds these from already-validated input and hands
//! them to the school service.

pub mod students {
    use shared::{LicenseCategory, StudentId};

    /// Input for enrolling a new student.
    #[derive(Debug, Clone)]
    pub struct EnrollStudentCommand {
        pub first_name: String,
        pub last_name: String,
        pub fiscal_code: String,
        pub category: LicenseCategory,
    }

    /// Result of an enrollment.
    #[derive(Debug, Clone, PartialEq)]
    pub struct EnrollStudentResult {
        pub student_id: StudentId,
        /// Registries whose companion record could not be created
        pub uninitialized: Vec<&'static str>,
    }
}

pub mod payments {
    use shared::{InstallmentSlot, StudentId};

    /// Overwrite one payment field of a student.
    #[derive(Debug, Clone)]
    pub struct RegisterInstallmentCommand {
        pub student_id: StudentId,
        pub slot: InstallmentSlot,
        pub amount: f64,
    }
}

pub mod exams {
    use shared::{ExamDate, ExamOutcome, StudentId};

    use crate::backend::domain::models::exam::AttemptRecord;

    /// Record one theory or practical attempt.
    #[derive(Debug, Clone)]
    pub struct RecordExamAttemptCommand {
        pub student_id: StudentId,
        pub outcome: ExamOutcome,
        pub date: ExamDate,
    }

    /// Penalty triggered by a second failed attempt
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PenaltyKind {
        /// Second theory failure: student suspended, first installment due again
        Suspension,
        /// Second practical failure: all three installments due again
        FullRepayment,
    }

    /// What the penalty actually changed. The steps run one after another
    /// without rollback, so either flag can be false on its own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PenaltyReport {
        pub kind: PenaltyKind,
        pub status_updated: bool,
        pub installments_reset: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ExamAttemptResult {
        pub attempt: AttemptRecord,
        pub penalty: Option<PenaltyReport>,
    }
}

pub mod drive_hours {
    use shared::StudentId;

    #[derive(Debug, Clone)]
    pub struct AddDriveHoursCommand {
        pub student_id: StudentId,
        pub hours: u32,
    }
}
