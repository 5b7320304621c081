//! Bounded, ordered record storage with an ID index.
//!
//! Every registry keeps its records in a `Vec` (so the on-disk order and the
//! alphabetical order of students survive) plus a `HashMap` from student ID
//! to position. The capacity bound is enforced on insert and on bulk load.

use std::collections::HashMap;

use shared::StudentId;

use super::models::drive_hours::DriveHours;
use super::models::errors::RegistryError;
use super::models::exam::Exam;
use super::models::payment::Payment;
use super::models::student::Student;

/// Records stored in a `RecordTable` are keyed by a student ID
pub trait Keyed {
    fn key(&self) -> StudentId;
}

impl Keyed for Student {
    fn key(&self) -> StudentId {
        self.id
    }
}

impl Keyed for Payment {
    fn key(&self) -> StudentId {
        self.student_id
    }
}

impl Keyed for Exam {
    fn key(&self) -> StudentId {
        self.student_id
    }
}

impl Keyed for DriveHours {
    fn key(&self) -> StudentId {
        self.student_id
    }
}

#[derive(Debug, Clone)]
pub struct RecordTable<R> {
    name: &'static str,
    capacity: usize,
    records: Vec<R>,
    index: HashMap<StudentId, usize>,
}

impl<R: Keyed> RecordTable<R> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a table from loaded records, keeping their order
    pub fn from_records(name: &'static str, capacity: usize, records: Vec<R>) -> Result<Self, RegistryError> {
        if records.len() > capacity {
            return Err(RegistryError::CapacityExceeded { registry: name, capacity });
        }

        let mut table = Self::new(name, capacity);
        for record in records {
            table.insert(record)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: StudentId) -> Option<&R> {
        self.index.get(&id).map(|&position| &self.records[position])
    }

    pub fn get_mut(&mut self, id: StudentId) -> Option<&mut R> {
        match self.index.get(&id) {
            Some(&position) => Some(&mut self.records[position]),
            None => None,
        }
    }

    pub fn require(&self, id: StudentId) -> Result<&R, RegistryError> {
        let name = self.name;
        self.get(id).ok_or(RegistryError::NotFound { registry: name, id })
    }

    pub fn require_mut(&mut self, id: StudentId) -> Result<&mut R, RegistryError> {
        let name = self.name;
        self.get_mut(id).ok_or(RegistryError::NotFound { registry: name, id })
    }

    /// Append a record; fails when the table is full or the ID is taken
    pub fn insert(&mut self, record: R) -> Result<&mut R, RegistryError> {
        if self.is_full() {
            return Err(RegistryError::CapacityExceeded {
                registry: self.name,
                capacity: self.capacity,
            });
        }

        let id = record.key();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateRecord { registry: self.name, id });
        }

        let position = self.records.len();
        self.records.push(record);
        self.index.insert(id, position);
        Ok(&mut self.records[position])
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Stable sort, then rebuild the ID index
    pub fn sort_by_key<K: Ord, F: FnMut(&R) -> K>(&mut self, key: F) {
        self.records.sort_by_key(key);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.key(), position))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = RecordTable::new("payment", 2);
        table.insert(Payment::new(4)).unwrap();
        table.insert(Payment::new(2)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2).unwrap().student_id, 2);
        assert!(table.get(3).is_none());
        assert_eq!(table.records()[0].student_id, 4);
    }

    #[test]
    fn test_capacity_is_reported() {
        let mut table = RecordTable::new("payment", 1);
        table.insert(Payment::new(1)).unwrap();
        let err = table.insert(Payment::new(2)).unwrap_err();
        assert_eq!(err, RegistryError::CapacityExceeded { registry: "payment", capacity: 1 });
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = RecordTable::new("payment", 5);
        table.insert(Payment::new(1)).unwrap();
        let err = table.insert(Payment::new(1)).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRecord { registry: "payment", id: 1 });
    }

    #[test]
    fn test_sort_rebuilds_index() {
        let mut table = RecordTable::new("payment", 5);
        for id in [3, 1, 2] {
            table.insert(Payment::new(id)).unwrap();
        }
        table.sort_by_key(|payment| payment.student_id);

        let ids: Vec<_> = table.iter().map(|payment| payment.student_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        table.get_mut(3).unwrap().extra = 10.0;
        assert_eq!(table.records()[2].extra, 10.0);
    }

    #[test]
    fn test_from_records_over_capacity() {
        let records = vec![Payment::new(1), Payment::new(2)];
        assert!(RecordTable::from_records("payment", 1, records).is_err());
    }
}
