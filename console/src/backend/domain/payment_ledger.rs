use log::{debug, info};
use shared::{InstallmentSlot, StudentId};

use crate::backend::domain::models::errors::RegistryError;
use crate::backend::domain::models::payment::{Payment, ENROLLMENT_FEE};
use crate::backend::domain::record_table::RecordTable;
use crate::backend::domain::validation;

/// One payment record per student
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    table: RecordTable<Payment>,
}

impl PaymentLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: RecordTable::new("payment", capacity),
        }
    }

    pub fn from_records(records: Vec<Payment>, capacity: usize) -> Result<Self, RegistryError> {
        Ok(Self {
            table: RecordTable::from_records("payment", capacity, records)?,
        })
    }

    /// Create the record with the first installment set to the enrollment fee
    pub fn initialize(&mut self, student_id: StudentId) -> Result<(), RegistryError> {
        self.table.insert(Payment::new(student_id))?;
        debug!("Initialized payment record for student {}", student_id);
        Ok(())
    }

    /// Overwrite one field. The resulting installments must still be
    /// paid in order.
    pub fn set_installment(
        &mut self,
        student_id: StudentId,
        slot: InstallmentSlot,
        amount: f64,
    ) -> Result<(), RegistryError> {
        if !validation::is_valid_amount(amount) {
            return Err(RegistryError::InvalidAmount(amount));
        }

        let payment = self.table.require_mut(student_id)?;
        let mut candidate = payment.clone();
        candidate.set(slot, amount);
        if !validation::is_installment_progression_valid(candidate.first, candidate.second, candidate.third) {
            return Err(RegistryError::ProgressionViolated {
                first: candidate.first,
                second: candidate.second,
                third: candidate.third,
            });
        }

        *payment = candidate;
        info!("Set {} of student {} to {:.2}", slot, student_id, amount);
        Ok(())
    }

    /// Sum of all four fields
    pub fn total(&self, student_id: StudentId) -> Result<f64, RegistryError> {
        Ok(self.table.require(student_id)?.total())
    }

    pub fn get(&self, student_id: StudentId) -> Option<&Payment> {
        self.table.get(student_id)
    }

    /// Penalty for a second theory failure
    pub fn reset_first_installment(&mut self, student_id: StudentId) -> Result<(), RegistryError> {
        let payment = self.table.require_mut(student_id)?;
        payment.first = ENROLLMENT_FEE;
        Ok(())
    }

    /// Penalty for a second practical failure. Resets all three
    /// installments, including ones never paid.
    pub fn reset_all_installments(&mut self, student_id: StudentId) -> Result<(), RegistryError> {
        let payment = self.table.require_mut(student_id)?;
        payment.first = ENROLLMENT_FEE;
        payment.second = ENROLLMENT_FEE;
        payment.third = ENROLLMENT_FEE;
        Ok(())
    }

    pub fn payments(&self) -> &[Payment] {
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

    fn ledger_with(id: StudentId) -> PaymentLedger {
        let mut ledger = PaymentLedger::new(10);
        ledger.initialize(id).unwrap();
        ledger
    }

    #[test]
    fn test_initialize_sets_enrollment_fee() {
        let ledger = ledger_with(1);
        let payment = ledger.get(1).unwrap();
        assert_eq!(payment.first, 250.0);
        assert_eq!(payment.second, 0.0);
        assert_eq!(ledger.total(1).unwrap(), 250.0);
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let mut ledger = ledger_with(1);
        assert!(matches!(
            ledger.initialize(1),
            Err(RegistryError::DuplicateRecord { id: 1, .. })
        ));
    }

    #[test]
    fn test_set_installment_overwrites() {
        let mut ledger = ledger_with(1);
        ledger.set_installment(1, InstallmentSlot::Second, 200.0).unwrap();
        ledger.set_installment(1, InstallmentSlot::Second, 250.0).unwrap();
        ledger.set_installment(1, InstallmentSlot::Extra, 30.0).unwrap();
        assert_eq!(ledger.get(1).unwrap().second, 250.0);
        assert_eq!(ledger.total(1).unwrap(), 530.0);
    }

    #[test]
    fn test_set_installment_rejects_negative_amount() {
        let mut ledger = ledger_with(1);
        let err = ledger.set_installment(1, InstallmentSlot::Extra, -5.0).unwrap_err();
        assert_eq!(err, RegistryError::InvalidAmount(-5.0));
    }

    #[test]
    fn test_progression_is_enforced() {
        let mut ledger = ledger_with(1);
        ledger.set_installment(1, InstallmentSlot::First, 0.0).unwrap();

        let err = ledger.set_installment(1, InstallmentSlot::Second, 100.0).unwrap_err();
        assert!(matches!(err, RegistryError::ProgressionViolated { .. }));
        assert_eq!(ledger.get(1).unwrap().second, 0.0);

        ledger.set_installment(1, InstallmentSlot::First, 250.0).unwrap();
        assert!(ledger.set_installment(1, InstallmentSlot::Third, 250.0).is_err());
        ledger.set_installment(1, InstallmentSlot::Second, 250.0).unwrap();
        ledger.set_installment(1, InstallmentSlot::Third, 250.0).unwrap();

        // Zeroing the first installment would leave later ones orphaned
        assert!(ledger.set_installment(1, InstallmentSlot::First, 0.0).is_err());
    }

    #[test]
    fn test_unknown_student() {
        let mut ledger = PaymentLedger::new(10);
        assert!(ledger.total(3).is_err());
        assert!(ledger.set_installment(3, InstallmentSlot::First, 10.0).is_err());
        assert!(ledger.reset_first_installment(3).is_err());
    }

    #[test]
    fn test_penalty_resets() {
        let mut ledger = ledger_with(1);
        ledger.set_installment(1, InstallmentSlot::First, 400.0).unwrap();
        ledger.reset_first_installment(1).unwrap();
        assert_eq!(ledger.get(1).unwrap().first, 250.0);

        ledger.reset_all_installments(1).unwrap();
        let payment = ledger.get(1).unwrap();
        assert_eq!(payment.installments_total(), 750.0);
        assert_eq!(payment.extra, 0.0);
    }
}
