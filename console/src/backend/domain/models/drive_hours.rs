use serde::{Deserialize, Serialize};
use shared::StudentId;

/// Practice hours every student must complete before the practical exam
pub const MANDATORY_DRIVE_HOURS: u32 = 6;

/// Largest total the drive-hours file can hold (stored as `i32`)
pub const MAX_TOTAL_HOURS: u32 = i32::MAX as u32;

/// Practice-driving hours logged for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveHours {
    pub student_id: StudentId,
    pub total_hours: u32,
    /// Always max(0, total_hours - MANDATORY_DRIVE_HOURS)
    pub extra_hours: u32,
}

impl DriveHours {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            total_hours: 0,
            extra_hours: 0,
        }
    }

    pub fn extra_for(total_hours: u32) -> u32 {
        total_hours.saturating_sub(MANDATORY_DRIVE_HOURS)
    }

    /// New total after adding `hours`, or `None` past [`MAX_TOTAL_HOURS`]
    pub fn total_after(total_hours: u32, hours: u32) -> Option<u32> {
        total_hours.checked_add(hours).filter(|total| *total <= MAX_TOTAL_HOURS)
    }

    pub(crate) fn add(&mut self, hours: u32) {
        self.total_hours = self.total_hours.saturating_add(hours).min(MAX_TOTAL_HOURS);
        self.extra_hours = Self::extra_for(self.total_hours);
    }

    pub fn meets_minimum(&self) -> bool {
        self.total_hours >= MANDATORY_DRIVE_HOURS
    }

    pub fn missing_mandatory(&self) -> u32 {
        MANDATORY_DRIVE_HOURS.saturating_sub(self.total_hours)
    }

    pub fn extra_cost(&self, hourly_rate: f64) -> f64 {
        if hourly_rate < 0.0 {
            return 0.0;
        }
        self.extra_hours as f64 * hourly_rate
    }
}
