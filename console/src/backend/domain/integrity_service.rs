//! Integrity check over all four registries.
//!
//! Records normally cannot reach an invalid state through the services, but
//! the data files can be edited or damaged between runs, so this runs the
//! validation predicates over everything that was loaded.

use log::{info, warn};
use shared::{ExamKind, IntegrityArea, IntegrityIssue, IntegrityReport, StudentId};

use crate::backend::domain::models::drive_hours::MANDATORY_DRIVE_HOURS;
use crate::backend::domain::models::exam::{Exam, ExamAttempts};
use crate::backend::domain::school_service::SchoolState;
use crate::backend::domain::validation;

pub fn check_integrity(state: &SchoolState) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    check_students(state, &mut report);
    check_payments(state, &mut report);
    check_exams(state, &mut report);
    check_drive_hours(state, &mut report);

    if report.is_clean() {
        info!("Integrity check passed");
    } else {
        warn!("Integrity check found {} issue(s)", report.issues.len());
    }
    report
}

fn push(report: &mut IntegrityReport, area: IntegrityArea, student_id: StudentId, message: impl Into<String>) {
    report.issues.push(IntegrityIssue {
        area,
        student_id,
        message: message.into(),
    });
}

fn check_students(state: &SchoolState, report: &mut IntegrityReport) {
    for student in state.students.students() {
        let area = IntegrityArea::Students;
        if !validation::is_valid_id(i64::from(student.id)) {
            push(report, area, student.id, "invalid student ID");
        }
        if !validation::is_non_empty(&student.first_name) || !validation::is_non_empty(&student.last_name) {
            push(report, area, student.id, "empty first or last name");
        }
        if !validation::is_valid_fiscal_code(&student.fiscal_code) {
            push(report, area, student.id, format!("invalid fiscal code '{}'", student.fiscal_code));
        }
    }
}

fn check_payments(state: &SchoolState, report: &mut IntegrityReport) {
    let area = IntegrityArea::Payments;
    for payment in state.payments.payments() {
        let id = payment.student_id;
        if state.students.find_by_id(id).is_none() {
            push(report, area, id, "payment record for unknown student");
        }
        let amounts = [payment.first, payment.second, payment.third, payment.extra];
        if !amounts.iter().all(|amount| validation::is_valid_amount(*amount)) {
            push(report, area, id, "negative amount");
        }
        if !validation::is_installment_progression_valid(payment.first, payment.second, payment.third) {
            push(report, area, id, "installments not paid in order");
        }
    }
}

fn check_exams(state: &SchoolState, report: &mut IntegrityReport) {
    let area = IntegrityArea::Exams;
    for exam in state.exams.exams() {
        let id = exam.student_id;
        if state.students.find_by_id(id).is_none() {
            push(report, area, id, "exam record for unknown student");
        }
        check_attempts(report, id, ExamKind::Theory, &exam.theory);
        check_attempts(report, id, ExamKind::Practical, &exam.practical);
        check_exam_order(state, report, exam);
    }
}

fn check_attempts(report: &mut IntegrityReport, id: StudentId, kind: ExamKind, progress: &ExamAttempts) {
    let area = IntegrityArea::Exams;
    if !validation::is_valid_attempts(progress.attempts) {
        push(report, area, id, format!("{} attempts out of range ({})", kind, progress.attempts));
    } else if !validation::is_exam_coherent(progress.attempts, progress.passed) {
        push(report, area, id, format!("{} marked passed without attempts", kind));
    }

    let dates = progress.recorded_dates();
    if dates.iter().any(|date| !validation::is_valid_exam_date(date)) {
        push(report, area, id, format!("invalid {} attempt date", kind));
    }
    if let [first, second] = dates.as_slice() {
        if validation::is_before(second, first) {
            push(report, area, id, format!("{} attempt dates out of order", kind));
        }
    }
}

fn check_exam_order(state: &SchoolState, report: &mut IntegrityReport, exam: &Exam) {
    if exam.practical.attempts == 0 {
        return;
    }
    let hours = state.drive_hours.total_hours(exam.student_id);
    if !validation::practical_prerequisites_met(exam.theory.passed, hours) {
        push(
            report,
            IntegrityArea::Exams,
            exam.student_id,
            "practical attempts recorded without theory pass or mandatory hours",
        );
    }
}

fn check_drive_hours(state: &SchoolState, report: &mut IntegrityReport) {
    let area = IntegrityArea::DriveHours;
    for record in state.drive_hours.records() {
        let id = record.student_id;
        if state.students.find_by_id(id).is_none() {
            push(report, area, id, "drive-hours record for unknown student");
        }
        if !validation::is_extra_hours_coherent(record.total_hours, record.extra_hours, MANDATORY_DRIVE_HOURS) {
            push(
                report,
                area,
                id,
                format!("extra hours {} do not match total {}", record.extra_hours, record.total_hours),
            );
        }
    }
}
