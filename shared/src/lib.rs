use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use chrono::Datelike;

/// Numeric student identifier, assigned sequentially starting at 1
pub type StudentId = u32;

/// Driving license category a student is enrolled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseCategory {
    A,
    B,
    AM,
}

impl LicenseCategory {
    pub const ALL: [LicenseCategory; 3] = [LicenseCategory::A, LicenseCategory::B, LicenseCategory::AM];

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseCategory::A => "A",
            LicenseCategory::B => "B",
            LicenseCategory::AM => "AM",
        }
    }
}

impl fmt::Display for LicenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseCategory {
    type Err = ParseValueError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(LicenseCategory::A),
            "B" => Ok(LicenseCategory::B),
            "AM" => Ok(LicenseCategory::AM),
            _ => Err(ParseValueError::InvalidCategory(s.to_string())),
        }
    }
}

/// Enrollment status of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Enrolled,
    Suspended,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Enrolled => "enrolled",
            StudentStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrolled" => Ok(StudentStatus::Enrolled),
            "suspended" => Ok(StudentStatus::Suspended),
            _ => Err(ParseValueError::InvalidStatus(s.to_string())),
        }
    }
}

/// The two required testing stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamKind {
    Theory,
    Practical,
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamKind::Theory => write!(f, "theory"),
            ExamKind::Practical => write!(f, "practical"),
        }
    }
}

/// Result of a single exam attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamOutcome {
    Passed,
    Failed,
}

impl ExamOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ExamOutcome::Passed)
    }
}

/// Day/month/year triple used to timestamp exam attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExamDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl ExamDate {
    pub fn new(day: u32, month: u32, year: u32) -> Self {
        Self { day, month, year }
    }

    /// Today's date in local time
    pub fn today() -> Self {
        let now = chrono::Local::now();
        Self {
            day: now.day(),
            month: now.month(),
            year: now.year().max(0) as u32,
        }
    }

    /// An all-zero date marks an unused attempt slot
    pub fn is_unset(&self) -> bool {
        self.day == 0 && self.month == 0 && self.year == 0
    }
}

impl fmt::Display for ExamDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// One of the payment fields a student can settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentSlot {
    First,
    Second,
    Third,
    Extra,
}

impl InstallmentSlot {
    /// Map the 1..=4 numbering used by the payment screens
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(InstallmentSlot::First),
            2 => Some(InstallmentSlot::Second),
            3 => Some(InstallmentSlot::Third),
            4 => Some(InstallmentSlot::Extra),
            _ => None,
        }
    }
}

impl fmt::Display for InstallmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallmentSlot::First => write!(f, "first installment"),
            InstallmentSlot::Second => write!(f, "second installment"),
            InstallmentSlot::Third => write!(f, "third installment"),
            InstallmentSlot::Extra => write!(f, "extra charge"),
        }
    }
}

/// Full view of one student: record, payments and exams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub fiscal_code: String,
    pub category: LicenseCategory,
    pub status: StudentStatus,
    pub payment: Option<PaymentStatus>,
    pub exams: Option<ExamStatus>,
}

/// Payment state of a single student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub student_id: StudentId,
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub extra: f64,
    /// Sum of all four fields
    pub total_paid: f64,
    /// Amount still due on the three installments (0 when complete)
    pub remaining_installments: f64,
}

/// Exam progress of a single student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamStatus {
    pub student_id: StudentId,
    pub theory_attempts: u32,
    pub theory_passed: bool,
    pub theory_dates: Vec<ExamDate>,
    pub practical_attempts: u32,
    pub practical_passed: bool,
    pub practical_dates: Vec<ExamDate>,
}

/// One row of the payment summary covering every student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummaryRow {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub installments_total: f64,
    /// Extra charge plus the cost of drive hours beyond the mandatory minimum
    pub extras_total: f64,
    pub total_paid: f64,
    pub complete: bool,
}

/// One row of the drive-hours listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveHoursRow {
    pub student_id: StudentId,
    /// None when the hours refer to an ID with no student record
    pub student_name: Option<String>,
    pub total_hours: u32,
    pub extra_hours: u32,
    pub missing_mandatory: u32,
}

/// The four conditions checked when deciding course completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityBreakdown {
    pub theory_passed: bool,
    pub practical_passed: bool,
    pub installments_complete: bool,
    pub drive_hours_complete: bool,
}

impl EligibilityBreakdown {
    pub fn is_eligible(&self) -> bool {
        self.theory_passed && self.practical_passed && self.installments_complete && self.drive_hours_complete
    }
}

/// Registry an integrity problem was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityArea {
    Students,
    Payments,
    Exams,
    DriveHours,
}

impl fmt::Display for IntegrityArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityArea::Students => write!(f, "students"),
            IntegrityArea::Payments => write!(f, "payments"),
            IntegrityArea::Exams => write!(f, "exams"),
            IntegrityArea::DriveHours => write!(f, "drive hours"),
        }
    }
}

/// A single inconsistency found by the integrity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub area: IntegrityArea,
    pub student_id: StudentId,
    pub message: String,
}

/// Outcome of checking every registry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_in(&self, area: IntegrityArea) -> impl Iterator<Item = &IntegrityIssue> {
        self.issues.iter().filter(move |issue| issue.area == area)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseValueError {
    InvalidCategory(String),
    InvalidStatus(String),
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseValueError::InvalidCategory(value) => {
                write!(f, "Invalid license category '{}' (expected A, B or AM)", value)
            }
            ParseValueError::InvalidStatus(value) => {
                write!(f, "Invalid student status '{}' (expected enrolled or suspended)", value)
            }
        }
    }
}

impl std::error::Error for ParseValueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_license_category() {
        assert_eq!("a".parse::<LicenseCategory>().unwrap(), LicenseCategory::A);
        assert_eq!(" am ".parse::<LicenseCategory>().unwrap(), LicenseCategory::AM);
        assert_eq!("B".parse::<LicenseCategory>().unwrap(), LicenseCategory::B);
        assert!("C".parse::<LicenseCategory>().is_err());
        assert!("".parse::<LicenseCategory>().is_err());
    }

    #[test]
    fn test_parse_student_status() {
        assert_eq!("ENROLLED".parse::<StudentStatus>().unwrap(), StudentStatus::Enrolled);
        assert_eq!("suspended".parse::<StudentStatus>().unwrap(), StudentStatus::Suspended);
        assert!("expelled".parse::<StudentStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let yaml = serde_yaml::to_string(&StudentStatus::Suspended).unwrap();
        assert_eq!(yaml.trim(), "suspended");
    }

    #[test]
    fn test_installment_slot_numbering() {
        assert_eq!(InstallmentSlot::from_number(1), Some(InstallmentSlot::First));
        assert_eq!(InstallmentSlot::from_number(4), Some(InstallmentSlot::Extra));
        assert_eq!(InstallmentSlot::from_number(0), None);
        assert_eq!(InstallmentSlot::from_number(5), None);
    }

    #[test]
    fn test_exam_date_display_and_unset() {
        assert_eq!(ExamDate::new(3, 7, 2024).to_string(), "03/07/2024");
        assert!(ExamDate::default().is_unset());
        assert!(!ExamDate::new(1, 1, 2024).is_unset());
    }

    #[test]
    fn test_eligibility_requires_all_conditions() {
        let all = EligibilityBreakdown {
            theory_passed: true,
            practical_passed: true,
            installments_complete: true,
            drive_hours_complete: true,
        };
        assert!(all.is_eligible());
        assert!(!EligibilityBreakdown { drive_hours_complete: false, ..all }.is_eligible());
        assert!(!EligibilityBreakdown { theory_passed: false, ..all }.is_eligible());
    }
}
