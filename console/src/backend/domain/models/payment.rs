use serde::{Deserialize, Serialize};
use shared::{InstallmentSlot, StudentId};

/// Fee charged at enrollment; first installment is pre-set to it
pub const ENROLLMENT_FEE: f64 = 250.0;

/// Sum of the three installments required to complete the course
pub const FULL_TUITION: f64 = 750.0;

/// Payment record of one student: three ordered installments plus extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub student_id: StudentId,
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub extra: f64,
}

impl Payment {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            first: ENROLLMENT_FEE,
            second: 0.0,
            third: 0.0,
            extra: 0.0,
        }
    }

    pub fn get(&self, slot: InstallmentSlot) -> f64 {
        match slot {
            InstallmentSlot::First => self.first,
            InstallmentSlot::Second => self.second,
            InstallmentSlot::Third => self.third,
            InstallmentSlot::Extra => self.extra,
        }
    }

    pub(crate) fn set(&mut self, slot: InstallmentSlot, amount: f64) {
        match slot {
            InstallmentSlot::First => self.first = amount,
            InstallmentSlot::Second => self.second = amount,
            InstallmentSlot::Third => self.third = amount,
            InstallmentSlot::Extra => self.extra = amount,
        }
    }

    /// Sum of the three installments, extras excluded
    pub fn installments_total(&self) -> f64 {
        self.first + self.second + self.third
    }

    /// Sum of all four fields
    pub fn total(&self) -> f64 {
        self.installments_total() + self.extra
    }

    pub fn installments_complete(&self) -> bool {
        self.installments_total() >= FULL_TUITION
    }

    /// What is still due on the three installments
    pub fn remaining_installments(&self) -> f64 {
        (FULL_TUITION - self.installments_total()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payment_starts_with_enrollment_fee() {
        let payment = Payment::new(3);
        assert_eq!(payment.first, ENROLLMENT_FEE);
        assert_eq!(payment.total(), 250.0);
        assert_eq!(payment.remaining_installments(), 500.0);
        assert!(!payment.installments_complete());
    }

    #[test]
    fn test_totals_exclude_extra_from_installments() {
        let mut payment = Payment::new(1);
        payment.set(InstallmentSlot::Second, 250.0);
        payment.set(InstallmentSlot::Third, 250.0);
        payment.set(InstallmentSlot::Extra, 40.0);
        assert_eq!(payment.installments_total(), 750.0);
        assert_eq!(payment.total(), 790.0);
        assert!(payment.installments_complete());
        assert_eq!(payment.remaining_installments(), 0.0);
    }
}
