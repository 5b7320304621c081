use serde::{Deserialize, Serialize};
use shared::{ExamDate, ExamKind, StudentId};

/// Attempts allowed per exam type
pub const MAX_ATTEMPTS: u32 = 2;

/// Progress on one exam type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamAttempts {
    pub attempts: u32,
    pub passed: bool,
    pub dates: [ExamDate; MAX_ATTEMPTS as usize],
}

impl ExamAttempts {
    pub fn exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Dates of the attempts actually taken
    pub fn recorded_dates(&self) -> Vec<ExamDate> {
        let taken = (self.attempts as usize).min(self.dates.len());
        self.dates[..taken]
            .iter()
            .copied()
            .filter(|date| !date.is_unset())
            .collect()
    }
}

/// Exam record of one student, covering theory and practical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub student_id: StudentId,
    pub theory: ExamAttempts,
    pub practical: ExamAttempts,
}

impl Exam {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            theory: ExamAttempts::default(),
            practical: ExamAttempts::default(),
        }
    }

    pub fn attempts(&self, kind: ExamKind) -> &ExamAttempts {
        match kind {
            ExamKind::Theory => &self.theory,
            ExamKind::Practical => &self.practical,
        }
    }

    pub(crate) fn attempts_mut(&mut self, kind: ExamKind) -> &mut ExamAttempts {
        match kind {
            ExamKind::Theory => &mut self.theory,
            ExamKind::Practical => &mut self.practical,
        }
    }
}

/// What a successfully recorded attempt did to the exam record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub kind: ExamKind,
    /// 1-based number of the attempt just recorded
    pub attempt_number: u32,
    pub passed: bool,
    /// True when this was a failure that used up the last attempt
    pub exhausted: bool,
}
