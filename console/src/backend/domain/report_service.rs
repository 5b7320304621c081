//! Read-only views over the school state.
//!
//! Everything here is computed on demand from the registries; nothing is
//! cached or written back. The console prints these DTOs and the export
//! service writes them to disk.

use std::fmt::Write as _;

use anyhow::Result;
use shared::{
    DriveHoursRow, ExamDate, ExamStatus, PaymentStatus, PaymentSummaryRow, StudentDetail, StudentId,
};

use crate::backend::domain::exam_tracker::ExamTracker;
use crate::backend::domain::models::drive_hours::MANDATORY_DRIVE_HOURS;
use crate::backend::domain::models::exam::ExamAttempts;
use crate::backend::domain::models::payment::FULL_TUITION;
use crate::backend::domain::payment_ledger::PaymentLedger;
use crate::backend::domain::school_service::{assess_eligibility, SchoolState};

const RULE: &str = "____________________________________________________________";

pub fn payment_status(payments: &PaymentLedger, student_id: StudentId) -> Option<PaymentStatus> {
    payments.get(student_id).map(|payment| PaymentStatus {
        student_id,
        first: payment.first,
        second: payment.second,
        third: payment.third,
        extra: payment.extra,
        total_paid: payment.total(),
        remaining_installments: payment.remaining_installments(),
    })
}

pub fn exam_status(exams: &ExamTracker, student_id: StudentId) -> Option<ExamStatus> {
    exams.get(student_id).map(|exam| ExamStatus {
        student_id,
        theory_attempts: exam.theory.attempts,
        theory_passed: exam.theory.passed,
        theory_dates: exam.theory.recorded_dates(),
        practical_attempts: exam.practical.attempts,
        practical_passed: exam.practical.passed,
        practical_dates: exam.practical.recorded_dates(),
    })
}

pub fn student_detail(state: &SchoolState, student_id: StudentId) -> Option<StudentDetail> {
    let student = state.students.find_by_id(student_id)?;
    Some(StudentDetail {
        id: student.id,
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        fiscal_code: student.fiscal_code.clone(),
        category: student.category,
        status: student.status,
        payment: payment_status(&state.payments, student_id),
        exams: exam_status(&state.exams, student_id),
    })
}

/// One row per payment record, in ledger order. Extra drive hours are
/// charged at `extra_hour_rate` and counted with the extras.
pub fn payment_summary(state: &SchoolState, extra_hour_rate: f64) -> Vec<PaymentSummaryRow> {
    state
        .payments
        .payments()
        .iter()
        .map(|payment| {
            let student = state.students.find_by_id(payment.student_id);
            let extras_total = payment.extra + state.drive_hours.extra_cost(payment.student_id, extra_hour_rate);
            let total_paid = payment.installments_total() + extras_total;
            PaymentSummaryRow {
                student_id: payment.student_id,
                first_name: student.map(|s| s.first_name.clone()).unwrap_or_default(),
                last_name: student.map(|s| s.last_name.clone()).unwrap_or_default(),
                installments_total: payment.installments_total(),
                extras_total,
                total_paid,
                complete: total_paid >= FULL_TUITION,
            }
        })
        .collect()
}

pub fn drive_hours_rows(state: &SchoolState) -> Vec<DriveHoursRow> {
    state
        .drive_hours
        .records()
        .iter()
        .map(|record| DriveHoursRow {
            student_id: record.student_id,
            student_name: state.students.find_by_id(record.student_id).map(|s| s.full_name()),
            total_hours: record.total_hours,
            extra_hours: record.extra_hours,
            missing_mandatory: record.missing_mandatory(),
        })
        .collect()
}

/// Full per-student report, in registry (alphabetical) order
pub fn render_full_report(state: &SchoolState, extra_hour_rate: f64) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", RULE)?;
    writeln!(out, "|{:^58}|", "DRIVING SCHOOL STUDENT REPORT")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Total students: {}", state.students.len())?;
    writeln!(out)?;

    for student in state.students.students() {
        let id = student.id;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "| ID: {}", id)?;
        writeln!(out, "| Name: {}", student.full_name())?;
        writeln!(out, "| Fiscal code: {}", student.fiscal_code)?;
        writeln!(out, "| License: {}", student.category)?;
        writeln!(out, "| Status: {}", student.status)?;
        writeln!(out, "{}", RULE)?;

        writeln!(out, "\n[PAYMENTS]")?;
        match state.payments.get(id) {
            Some(payment) => {
                let extra_hours = state.drive_hours.get(id).map_or(0, |record| record.extra_hours);
                let extra_hours_cost = state.drive_hours.extra_cost(id, extra_hour_rate);
                writeln!(out, "  First installment:  {:.2} EUR", payment.first)?;
                writeln!(out, "  Second installment: {:.2} EUR", payment.second)?;
                writeln!(out, "  Third installment:  {:.2} EUR", payment.third)?;
                writeln!(out, "  Other extras:       {:.2} EUR", payment.extra)?;
                writeln!(
                    out,
                    "  Extra drives ({} h x {:.2} EUR): {:.2} EUR",
                    extra_hours, extra_hour_rate, extra_hours_cost
                )?;
                writeln!(out, "  -------------------------")?;
                writeln!(out, "  TOTAL PAID:         {:.2} EUR", payment.total() + extra_hours_cost)?;
                if payment.installments_complete() {
                    writeln!(out, "  Installments complete")?;
                } else {
                    writeln!(out, "  {:.2} EUR still due on installments", payment.remaining_installments())?;
                }
            }
            None => writeln!(out, "  No payments recorded.")?,
        }

        writeln!(out, "\n[EXAMS]")?;
        match state.exams.get(id) {
            Some(exam) => {
                write_exam(&mut out, "Theory", &exam.theory)?;
                write_exam(&mut out, "Practical", &exam.practical)?;
            }
            None => writeln!(out, "  No exams recorded.")?,
        }

        writeln!(out, "\n[DRIVES]")?;
        match state.drive_hours.get(id) {
            Some(record) => {
                writeln!(out, "  Hours driven: {}", record.total_hours)?;
                writeln!(out, "  Extra hours:  {}", record.extra_hours)?;
                if record.meets_minimum() {
                    writeln!(out, "  Mandatory hours completed")?;
                } else {
                    writeln!(
                        out,
                        "  {} of {} mandatory hours missing",
                        record.missing_mandatory(),
                        MANDATORY_DRIVE_HOURS
                    )?;
                }
            }
            None => writeln!(out, "  No drives recorded.")?,
        }

        let verdict = assess_eligibility(&state.exams, &state.payments, &state.drive_hours, id);
        writeln!(out, "\n[OUTCOME]")?;
        writeln!(out, "  Theory exam:     {}", passed_label(verdict.theory_passed))?;
        writeln!(out, "  Practical exam:  {}", passed_label(verdict.practical_passed))?;
        writeln!(out, "  Payments:        {}", complete_label(verdict.installments_complete))?;
        writeln!(out, "  Drives ({}+ h):   {}", MANDATORY_DRIVE_HOURS, complete_label(verdict.drive_hours_complete))?;
        writeln!(out, "  -------------------------")?;
        writeln!(out, "  -> {}", if verdict.is_eligible() { "ELIGIBLE" } else { "NOT ELIGIBLE" })?;
        writeln!(out, "\n{}\n", RULE)?;
    }

    Ok(out)
}

fn write_exam(out: &mut String, label: &str, progress: &ExamAttempts) -> std::fmt::Result {
    writeln!(
        out,
        "  {}: {} attempt(s) - {}",
        label,
        progress.attempts,
        passed_label(progress.passed)
    )?;
    let dates: Vec<ExamDate> = progress.recorded_dates();
    for (n, date) in dates.iter().enumerate() {
        writeln!(out, "    - Attempt {}: {}", n + 1, date)?;
    }
    Ok(())
}

fn passed_label(passed: bool) -> &'static str {
    if passed {
        "Passed"
    } else {
        "Not passed"
    }
}

fn complete_label(complete: bool) -> &'static str {
    if complete {
        "Complete"
    } else {
        "Incomplete"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::drive_hours::AddDriveHoursCommand;
    use crate::backend::domain::commands::exams::RecordExamAttemptCommand;
    use crate::backend::domain::commands::payments::RegisterInstallmentCommand;
    use crate::backend::domain::commands::students::EnrollStudentCommand;
    use crate::backend::domain::school_service::SchoolService;
    use shared::{ExamOutcome, InstallmentSlot, LicenseCategory};

    fn service_with_two_students() -> SchoolService {
        let mut service = SchoolService::with_capacity(10);
        for (first, last) in [("Mario", "Rossi"), ("Anna", "Bianchi")] {
            service
                .enroll_student(EnrollStudentCommand {
                    first_name: first.into(),
                    last_name: last.into(),
                    fiscal_code: "RSSMRA85T10A562S".into(),
                    category: LicenseCategory::B,
                })
                .unwrap();
        }
        service
    }

    #[test]
    fn test_payment_summary_includes_extra_hour_cost() {
        let mut service = service_with_two_students();
        service
            .register_installment(RegisterInstallmentCommand {
                student_id: 1,
                slot: InstallmentSlot::Second,
                amount: 250.0,
            })
            .unwrap();
        service
            .register_installment(RegisterInstallmentCommand {
                student_id: 1,
                slot: InstallmentSlot::Third,
                amount: 200.0,
            })
            .unwrap();
        service.add_drive_hours(AddDriveHoursCommand { student_id: 1, hours: 10 }).unwrap();

        let rows = payment_summary(service.state(), 15.0);
        let row = rows.iter().find(|row| row.student_id == 1).unwrap();
        assert_eq!(row.installments_total, 700.0);
        assert_eq!(row.extras_total, 60.0);
        assert_eq!(row.total_paid, 760.0);
        assert!(row.complete);
        assert_eq!(row.last_name, "Rossi");

        let other = rows.iter().find(|row| row.student_id == 2).unwrap();
        assert!(!other.complete);
    }

    #[test]
    fn test_student_detail_combines_records() {
        let mut service = service_with_two_students();
        service
            .record_theory_attempt(RecordExamAttemptCommand {
                student_id: 2,
                outcome: ExamOutcome::Failed,
                date: ExamDate::new(3, 4, 2024),
            })
            .unwrap();

        let detail = student_detail(service.state(), 2).unwrap();
        assert_eq!(detail.first_name, "Anna");
        assert_eq!(detail.payment.unwrap().remaining_installments, 500.0);
        let exams = detail.exams.unwrap();
        assert_eq!(exams.theory_attempts, 1);
        assert_eq!(exams.theory_dates, vec![ExamDate::new(3, 4, 2024)]);
        assert!(student_detail(service.state(), 9).is_none());
    }

    #[test]
    fn test_drive_hours_rows() {
        let mut service = service_with_two_students();
        service.add_drive_hours(AddDriveHoursCommand { student_id: 2, hours: 4 }).unwrap();
        let rows = drive_hours_rows(service.state());
        let row = rows.iter().find(|row| row.student_id == 2).unwrap();
        assert_eq!(row.student_name.as_deref(), Some("Anna Bianchi"));
        assert_eq!(row.missing_mandatory, 2);
    }

    #[test]
    fn test_full_report_sections() {
        let service = service_with_two_students();
        let report = render_full_report(service.state(), 15.0).unwrap();

        assert!(report.contains("Total students: 2"));
        assert!(report.contains("| Name: Anna Bianchi"));
        assert!(report.contains("[PAYMENTS]"));
        assert!(report.contains("500.00 EUR still due on installments"));
        assert!(report.contains("6 of 6 mandatory hours missing"));
        assert!(report.contains("-> NOT ELIGIBLE"));
        // Alphabetical order
        assert!(report.find("Bianchi").unwrap() < report.find("Rossi").unwrap());
    }
}
