use log::{debug, info};
use shared::StudentId;

use crate::backend::domain::models::drive_hours::{DriveHours, MAX_TOTAL_HOURS};
use crate::backend::domain::models::errors::RegistryError;
use crate::backend::domain::record_table::RecordTable;

#[derive(Debug, Clone)]
pub struct DriveHoursTracker {
    table: RecordTable<DriveHours>,
}

impl DriveHoursTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: RecordTable::new("drive hours", capacity),
        }
    }

    pub fn from_records(records: Vec<DriveHours>, capacity: usize) -> Result<Self, RegistryError> {
        Ok(Self {
            table: RecordTable::from_records("drive hours", capacity, records)?,
        })
    }

    pub fn initialize(&mut self, student_id: StudentId) -> Result<(), RegistryError> {
        self.table.insert(DriveHours::new(student_id))?;
        debug!("Initialized drive-hours record for student {}", student_id);
        Ok(())
    }

    /// Accumulate hours, creating the record on first use
    pub fn add_hours(&mut self, student_id: StudentId, hours: u32) -> Result<&DriveHours, RegistryError> {
        if hours == 0 {
            return Err(RegistryError::InvalidHours);
        }
        let current = self.total_hours(student_id);
        if DriveHours::total_after(current, hours).is_none() {
            return Err(RegistryError::HoursLimitExceeded {
                current,
                added: hours,
                max: MAX_TOTAL_HOURS,
            });
        }

        let record = if self.table.contains(student_id) {
            self.table.require_mut(student_id)?
        } else {
            debug!("No drive-hours record for student {}, creating one", student_id);
            self.table.insert(DriveHours::new(student_id))?
        };
        record.add(hours);

        info!(
            "Added {} drive hours for student {} (total {}, extra {})",
            hours, student_id, record.total_hours, record.extra_hours
        );
        Ok(record)
    }

    /// False when the student has no record
    pub fn meets_minimum(&self, student_id: StudentId) -> bool {
        self.table.get(student_id).is_some_and(DriveHours::meets_minimum)
    }

    /// Cost of the hours beyond the mandatory minimum; zero without a record
    pub fn extra_cost(&self, student_id: StudentId, hourly_rate: f64) -> f64 {
        self.table
            .get(student_id)
            .map_or(0.0, |record| record.extra_cost(hourly_rate))
    }

    pub fn total_hours(&self, student_id: StudentId) -> u32 {
        self.table.get(student_id).map_or(0, |record| record.total_hours)
    }

    pub fn get(&self, student_id: StudentId) -> Option<&DriveHours> {
        self.table.get(student_id)
    }

    pub fn records(&self) -> &[DriveHours] {
        self.table.records()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_hours_accumulates_and_computes_extra() {
        let mut tracker = DriveHoursTracker::new(10);
        tracker.initialize(1).unwrap();
        tracker.add_hours(1, 4).unwrap();
        let record = tracker.add_hours(1, 5).unwrap();

        assert_eq!(record.total_hours, 9);
        assert_eq!(record.extra_hours, 3);
        assert!(tracker.meets_minimum(1));
        assert_eq!(tracker.extra_cost(1, 15.0), 45.0);
    }

    #[test]
    fn test_add_hours_creates_missing_record() {
        let mut tracker = DriveHoursTracker::new(10);
        tracker.add_hours(4, 2).unwrap();
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.total_hours(4), 2);
        assert!(!tracker.meets_minimum(4));
    }

    #[test]
    fn test_zero_hours_rejected() {
        let mut tracker = DriveHoursTracker::new(10);
        assert_eq!(tracker.add_hours(1, 0).unwrap_err(), RegistryError::InvalidHours);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_hours_past_file_limit_rejected() {
        let mut tracker = DriveHoursTracker::new(10);
        tracker.add_hours(1, 10).unwrap();

        let err = tracker.add_hours(1, MAX_TOTAL_HOURS).unwrap_err();
        assert!(matches!(err, RegistryError::HoursLimitExceeded { current: 10, .. }));
        assert_eq!(tracker.total_hours(1), 10);

        assert!(tracker.add_hours(2, 3_000_000_000).is_err());
        assert!(tracker.get(2).is_none());
    }

    #[test]
    fn test_missing_record_defaults() {
        let tracker = DriveHoursTracker::new(10);
        assert!(!tracker.meets_minimum(2));
        assert_eq!(tracker.total_hours(2), 0);
        assert_eq!(tracker.extra_cost(2, 15.0), 0.0);
    }

    #[test]
    fn test_full_tracker_cannot_create_record() {
        let mut tracker = DriveHoursTracker::new(1);
        tracker.add_hours(1, 3).unwrap();
        assert!(matches!(
            tracker.add_hours(2, 3),
            Err(RegistryError::CapacityExceeded { .. })
        ));
    }
}
