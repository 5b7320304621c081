//! console/src/backend/domain/models/student.rs

use serde::{Deserialize, Serialize};
use shared::{LicenseCategory, StudentId, StudentStatus};

/// Longest first/last name accepted, in bytes
pub const MAX_NAME_LEN: usize = 29;

/// Domain model representing an enrolled student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub fiscal_code: String,
    pub category: LicenseCategory,
    pub status: StudentStatus,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive exact match on first and last name
    pub fn has_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.to_lowercase() == first_name.trim().to_lowercase()
            && self.last_name.to_lowercase() == last_name.trim().to_lowercase()
    }

    /// Key used for alphabetical ordering: (last name, first name), case-insensitive
    pub fn sort_key(&self) -> (String, String) {
        (self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }

    pub fn is_suspended(&self) -> bool {
        self.status == StudentStatus::Suspended
    }
}
