use log::{debug, info};
use shared::{ExamDate, ExamKind, ExamOutcome, StudentId};

use crate::backend::domain::models::drive_hours::MANDATORY_DRIVE_HOURS;
use crate::backend::domain::models::errors::{ExamError, RegistryError};
use crate::backend::domain::models::exam::{AttemptRecord, Exam};
use crate::backend::domain::record_table::RecordTable;

/// One exam record per student; theory and practical capped at two attempts each
#[derive(Debug, Clone)]
pub struct ExamTracker {
    table: RecordTable<Exam>,
}

impl ExamTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: RecordTable::new("exam", capacity),
        }
    }

    pub fn from_records(records: Vec<Exam>, capacity: usize) -> Result<Self, RegistryError> {
        Ok(Self {
            table: RecordTable::from_records("exam", capacity, records)?,
        })
    }

    pub fn initialize(&mut self, student_id: StudentId) -> Result<(), RegistryError> {
        self.table.insert(Exam::new(student_id))?;
        debug!("Initialized exam record for student {}", student_id);
        Ok(())
    }

    pub fn record_theory_attempt(
        &mut self,
        student_id: StudentId,
        outcome: ExamOutcome,
        date: ExamDate,
    ) -> Result<AttemptRecord, ExamError> {
        let exam = self.table.get_mut(student_id).ok_or(ExamError::NotFound(student_id))?;
        Self::record(exam, ExamKind::Theory, outcome, date)
    }

    /// `hours_completed` is the student's total logged drive hours
    pub fn record_practical_attempt(
        &mut self,
        student_id: StudentId,
        outcome: ExamOutcome,
        date: ExamDate,
        hours_completed: u32,
    ) -> Result<AttemptRecord, ExamError> {
        let exam = self.table.get_mut(student_id).ok_or(ExamError::NotFound(student_id))?;

        if !exam.theory.passed {
            return Err(ExamError::TheoryNotPassed);
        }
        if hours_completed < MANDATORY_DRIVE_HOURS {
            return Err(ExamError::InsufficientDriveHours {
                completed: hours_completed,
                required: MANDATORY_DRIVE_HOURS,
            });
        }

        Self::record(exam, ExamKind::Practical, outcome, date)
    }

    fn record(
        exam: &mut Exam,
        kind: ExamKind,
        outcome: ExamOutcome,
        date: ExamDate,
    ) -> Result<AttemptRecord, ExamError> {
        let student_id = exam.student_id;
        let progress = exam.attempts_mut(kind);
        if progress.passed {
            return Err(ExamError::AlreadyPassed(kind));
        }
        if progress.exhausted() {
            return Err(ExamError::AttemptsExhausted(kind));
        }

        progress.dates[progress.attempts as usize] = date;
        progress.attempts += 1;
        progress.passed = outcome.is_pass();

        let record = AttemptRecord {
            kind,
            attempt_number: progress.attempts,
            passed: progress.passed,
            exhausted: !progress.passed && progress.exhausted(),
        };
        info!(
            "Recorded {} attempt {} for student {} on {}: {}",
            kind,
            record.attempt_number,
            student_id,
            date,
            if record.passed { "passed" } else { "failed" }
        );
        Ok(record)
    }

    pub fn get(&self, student_id: StudentId) -> Option<&Exam> {
        self.table.get(student_id)
    }

    pub fn exams(&self) -> &[Exam] {
        self.table.records()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
