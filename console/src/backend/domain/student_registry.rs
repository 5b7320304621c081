use log::{debug, info};
use shared::{LicenseCategory, StudentId, StudentStatus};

use crate::backend::domain::commands::students::EnrollStudentCommand;
use crate::backend::domain::models::errors::RegistryError;
use crate::backend::domain::models::student::{Student, MAX_NAME_LEN};
use crate::backend::domain::record_table::RecordTable;
use crate::backend::domain::validation;

/// Authoritative list of students; assigns sequential IDs starting at 1
#[derive(Debug, Clone)]
pub struct StudentRegistry {
    table: RecordTable<Student>,
    next_id: StudentId,
}

impl StudentRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: RecordTable::new("student", capacity),
            next_id: 1,
        }
    }

    /// Rebuild the registry from loaded records: sorted, next ID recomputed
    pub fn from_records(records: Vec<Student>, capacity: usize) -> Result<Self, RegistryError> {
        let mut registry = Self {
            table: RecordTable::from_records("student", capacity, records)?,
            next_id: 1,
        };
        registry.sort_alphabetical();
        registry.recompute_next_id();
        Ok(registry)
    }

    /// Append a new student with status `enrolled` and return its ID
    pub fn enroll(&mut self, command: EnrollStudentCommand) -> Result<StudentId, RegistryError> {
        if self.table.is_full() {
            return Err(RegistryError::CapacityExceeded {
                registry: self.table.name(),
                capacity: self.table.capacity(),
            });
        }

        let first_name = Self::validate_name("first name", &command.first_name)?;
        let last_name = Self::validate_name("last name", &command.last_name)?;
        let fiscal_code = command.fiscal_code.trim().to_ascii_uppercase();
        if !validation::is_valid_fiscal_code(&fiscal_code) {
            return Err(RegistryError::InvalidField {
                field: "fiscal code",
                reason: format!("'{}' does not match the 16-character pattern", command.fiscal_code),
            });
        }

        let id = self.next_id;
        self.table.insert(Student {
            id,
            first_name,
            last_name,
            fiscal_code,
            category: command.category,
            status: StudentStatus::Enrolled,
        })?;
        self.next_id += 1;

        info!("Enrolled student {} ({} {})", id, command.first_name.trim(), command.last_name.trim());
        Ok(id)
    }

    fn validate_name(field: &'static str, value: &str) -> Result<String, RegistryError> {
        let trimmed = value.trim();
        if !validation::is_non_empty(trimmed) {
            return Err(RegistryError::InvalidField {
                field,
                reason: "cannot be empty".to_string(),
            });
        }
        if trimmed.len() > MAX_NAME_LEN {
            return Err(RegistryError::InvalidField {
                field,
                reason: format!("cannot exceed {} characters", MAX_NAME_LEN),
            });
        }
        Ok(trimmed.to_string())
    }

    pub fn find_by_name(&self, first_name: &str, last_name: &str) -> Option<StudentId> {
        self.table
            .iter()
            .find(|student| student.has_name(first_name, last_name))
            .map(|student| student.id)
    }

    pub fn find_by_id(&self, id: StudentId) -> Option<&Student> {
        self.table.get(id)
    }

    /// Stable ordering by (last name, first name), case-insensitive
    pub fn sort_alphabetical(&mut self) {
        self.table.sort_by_key(Student::sort_key);
        debug!("Sorted {} students alphabetically", self.table.len());
    }

    pub fn set_status(&mut self, id: StudentId, status: StudentStatus) -> Result<(), RegistryError> {
        let student = self.table.require_mut(id)?;
        student.status = status;
        Ok(())
    }

    /// Next assignable ID becomes max(existing ID) + 1
    pub fn recompute_next_id(&mut self) {
        self.next_id = self.table.iter().map(|student| student.id).max().unwrap_or(0) + 1;
    }

    pub fn next_id(&self) -> StudentId {
        self.next_id
    }

    pub fn filter_by_category(&self, category: LicenseCategory) -> Vec<&Student> {
        self.table.iter().filter(|student| student.category == category).collect()
    }

    pub fn filter_by_status(&self, status: StudentStatus) -> Vec<&Student> {
        self.table.iter().filter(|student| student.status == status).collect()
    }

    pub fn students(&self) -> &[Student] {
        self.table.records()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(first: &str, last: &str) -> EnrollStudentCommand {
        EnrollStudentCommand {
            first_name: first.to_string(),
            last_name: last.to_string(),
            fiscal_code: "RSSMRA85T10A562S".to_string(),
            category: LicenseCategory::B,
        }
    }

    #[test]
    fn test_enroll_assigns_sequential_ids() {
        let mut registry = StudentRegistry::new(10);
        let first = registry.enroll(command("Mario", "Rossi")).unwrap();
        let second = registry.enroll(command("Anna", "Bianchi")).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.next_id(), 3);

        let student = registry.find_by_id(first).unwrap();
        assert_eq!(student.status, StudentStatus::Enrolled);
        assert_eq!(student.category, LicenseCategory::B);
    }

    #[test]
    fn test_enroll_trims_and_uppercases() {
        let mut registry = StudentRegistry::new(10);
        let mut cmd = command("  Mario ", " Rossi");
        cmd.fiscal_code = "rssmra85t10a562s".to_string();
        let id = registry.enroll(cmd).unwrap();

        let student = registry.find_by_id(id).unwrap();
        assert_eq!(student.first_name, "Mario");
        assert_eq!(student.last_name, "Rossi");
        assert_eq!(student.fiscal_code, "RSSMRA85T10A562S");
    }

    #[test]
    fn test_enroll_validation() {
        let mut registry = StudentRegistry::new(10);
        assert!(registry.enroll(command(" ", "Rossi")).is_err());
        assert!(registry.enroll(command("Mario", &"x".repeat(30))).is_err());

        let mut bad_code = command("Mario", "Rossi");
        bad_code.fiscal_code = "123".to_string();
        let err = registry.enroll(bad_code).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField { field: "fiscal code", .. }));

        // Rejected enrollments do not consume IDs
        assert_eq!(registry.next_id(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_enroll_when_full() {
        let mut registry = StudentRegistry::new(1);
        registry.enroll(command("Mario", "Rossi")).unwrap();
        let err = registry.enroll(command("Anna", "Bianchi")).unwrap_err();
        assert_eq!(err.kind(), crate::backend::domain::models::errors::ErrorKind::CapacityExceeded);
        assert_eq!(registry.next_id(), 2);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let mut registry = StudentRegistry::new(10);
        let id = registry.enroll(command("Mario", "Rossi")).unwrap();

        assert_eq!(registry.find_by_name("mario", "ROSSI"), Some(id));
        assert_eq!(registry.find_by_name("Mario", "Ross"), None);
        assert!(registry.find_by_id(99).is_none());
    }

    #[test]
    fn test_sort_alphabetical_by_last_then_first() {
        let mut registry = StudentRegistry::new(10);
        registry.enroll(command("Mario", "rossi")).unwrap();
        registry.enroll(command("Luca", "Bianchi")).unwrap();
        registry.enroll(command("Anna", "Rossi")).unwrap();
        registry.sort_alphabetical();

        let names: Vec<_> = registry.students().iter().map(Student::full_name).collect();
        assert_eq!(names, vec!["Luca Bianchi", "Anna Rossi", "Mario rossi"]);
        // Index still resolves after reordering
        assert_eq!(registry.find_by_id(1).unwrap().first_name, "Mario");
    }

    #[test]
    fn test_set_status() {
        let mut registry = StudentRegistry::new(10);
        let id = registry.enroll(command("Mario", "Rossi")).unwrap();
        registry.set_status(id, StudentStatus::Suspended).unwrap();
        assert!(registry.find_by_id(id).unwrap().is_suspended());
        assert!(registry.set_status(42, StudentStatus::Suspended).is_err());
    }

    #[test]
    fn test_from_records_recomputes_next_id() {
        let records = vec![
            Student {
                id: 7,
                first_name: "Zoe".into(),
                last_name: "Verdi".into(),
                fiscal_code: "VRDZOE90A41H501X".into(),
                category: LicenseCategory::A,
                status: StudentStatus::Suspended,
            },
            Student {
                id: 3,
                first_name: "Ugo".into(),
                last_name: "Neri".into(),
                fiscal_code: "NREUGO80A01H501Y".into(),
                category: LicenseCategory::AM,
                status: StudentStatus::Enrolled,
            },
        ];
        let registry = StudentRegistry::from_records(records, 10).unwrap();

        assert_eq!(registry.next_id(), 8);
        assert_eq!(registry.students()[0].last_name, "Neri");
        assert_eq!(registry.filter_by_status(StudentStatus::Suspended).len(), 1);
        assert_eq!(registry.filter_by_category(LicenseCategory::AM)[0].id, 3);
    }
}
