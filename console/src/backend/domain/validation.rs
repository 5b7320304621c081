//! Pure validation predicates over primitive values.
//!
//! Nothing in here touches a registry; the console layer uses these before
//! handing values to the domain, and the integrity check runs them over
//! records loaded from disk.

use shared::{ExamDate, InstallmentSlot, LicenseCategory, StudentStatus};

use super::models::drive_hours::{MANDATORY_DRIVE_HOURS, MAX_TOTAL_HOURS};
use super::models::exam::MAX_ATTEMPTS;

/// Italian fiscal code shape: 6 letters, 2 digits, 1 letter, 2 digits,
/// 4 alphanumerics, 1 control letter.
pub fn is_valid_fiscal_code(code: &str) -> bool {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() != 16 {
        return false;
    }

    chars[..6].iter().all(|c| c.is_ascii_alphabetic())
        && chars[6..8].iter().all(|c| c.is_ascii_digit())
        && chars[8].is_ascii_alphabetic()
        && chars[9..11].iter().all(|c| c.is_ascii_digit())
        && chars[11..15].iter().all(|c| c.is_ascii_alphanumeric())
        && chars[15].is_ascii_alphabetic()
}

pub fn is_valid_category(value: &str) -> bool {
    value.parse::<LicenseCategory>().is_ok()
}

pub fn is_valid_status(value: &str) -> bool {
    value.parse::<StudentStatus>().is_ok()
}

pub fn is_non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

/// Hours for a single drive: positive and storable
pub fn is_valid_hours(hours: u32) -> bool {
    hours > 0 && hours <= MAX_TOTAL_HOURS
}

pub fn is_valid_attempts(attempts: u32) -> bool {
    attempts <= MAX_ATTEMPTS
}

pub fn is_valid_id(id: i64) -> bool {
    id > 0
}

pub fn is_valid_installment_number(number: u32) -> bool {
    InstallmentSlot::from_number(number).is_some()
}

/// Calendar check, simplified: February allows 29 days in any year
pub fn is_valid_date(day: u32, month: u32, year: u32) -> bool {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || !(2000..=2100).contains(&year) {
        return false;
    }

    match month {
        2 => day <= 29,
        4 | 6 | 9 | 11 => day <= 30,
        _ => true,
    }
}

pub fn is_valid_exam_date(date: &ExamDate) -> bool {
    is_valid_date(date.day, date.month, date.year)
}

/// Strictly earlier
pub fn is_before(a: &ExamDate, b: &ExamDate) -> bool {
    (a.year, a.month, a.day) < (b.year, b.month, b.day)
}

/// A passed exam needs at least one attempt; attempts stay within bounds
pub fn is_exam_coherent(attempts: u32, passed: bool) -> bool {
    if passed && attempts == 0 {
        return false;
    }
    is_valid_attempts(attempts)
}

pub fn is_extra_hours_coherent(total_hours: u32, extra_hours: u32, threshold: u32) -> bool {
    if total_hours <= threshold {
        extra_hours == 0
    } else {
        extra_hours == total_hours - threshold
    }
}

/// An installment may be positive only if every preceding one is
pub fn is_installment_progression_valid(first: f64, second: f64, third: f64) -> bool {
    if first < 0.0 || second < 0.0 || third < 0.0 {
        return false;
    }
    if second > 0.0 && first <= 0.0 {
        return false;
    }
    if third > 0.0 && second <= 0.0 {
        return false;
    }
    true
}

pub fn practical_prerequisites_met(theory_passed: bool, drive_hours: u32) -> bool {
    theory_passed && drive_hours >= MANDATORY_DRIVE_HOURS
}
