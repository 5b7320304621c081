use shared::{ExamKind, StudentId};

/// Coarse error categories reported back to the console layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    CapacityExceeded,
    InvalidState,
    PrerequisiteNotMet,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("No {registry} record for student {id}")]
    NotFound { registry: &'static str, id: StudentId },
    #[error("The {registry} registry is full ({capacity} records)")]
    CapacityExceeded { registry: &'static str, capacity: usize },
    #[error("A {registry} record for student {id} already exists")]
    DuplicateRecord { registry: &'static str, id: StudentId },
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Amount cannot be negative: {0:.2}")]
    InvalidAmount(f64),
    #[error("Hours to add must be positive")]
    InvalidHours,
    #[error("Adding {added} hours to {current} would exceed the limit of {max} hours")]
    HoursLimitExceeded { current: u32, added: u32, max: u32 },
    #[error("Installments must be paid in order (first {first:.2}, second {second:.2}, third {third:.2})")]
    ProgressionViolated { first: f64, second: f64, third: f64 },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            RegistryError::DuplicateRecord { .. }
            | RegistryError::InvalidField { .. }
            | RegistryError::InvalidAmount(_)
            | RegistryError::InvalidHours
            | RegistryError::HoursLimitExceeded { .. }
            | RegistryError::ProgressionViolated { .. } => ErrorKind::InvalidState,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExamError {
    #[error("No exam record for student {0}")]
    NotFound(StudentId),
    #[error("The {0} exam has already been passed")]
    AlreadyPassed(ExamKind),
    #[error("No {0} exam attempts left")]
    AttemptsExhausted(ExamKind),
    #[error("The theory exam must be passed before the practical exam")]
    TheoryNotPassed,
    #[error("At least {required} drive hours are required, only {completed} completed")]
    InsufficientDriveHours { completed: u32, required: u32 },
}

impl ExamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExamError::NotFound(_) => ErrorKind::NotFound,
            ExamError::AlreadyPassed(_) | ExamError::AttemptsExhausted(_) => ErrorKind::InvalidState,
            ExamError::TheoryNotPassed | ExamError::InsufficientDriveHours { .. } => {
                ErrorKind::PrerequisiteNotMet
            }
        }
    }
}
