//! Interactive menu loop.
//!
//! Reads choices through [`Prompt`], turns them into domain commands and
//! prints the results. Domain errors are shown to the user and the loop
//! goes on; only I/O failures end the session early. End of input behaves
//! like "exit and save".

use anyhow::Result;
use log::{info, warn};
use std::io::{BufRead, Write};

use shared::{InstallmentSlot, LicenseCategory, StudentId};

use super::prompt::{InputClosed, Prompt};
use crate::backend::domain::commands::drive_hours::AddDriveHoursCommand;
use crate::backend::domain::commands::exams::{ExamAttemptResult, PenaltyKind, RecordExamAttemptCommand};
use crate::backend::domain::commands::payments::RegisterInstallmentCommand;
use crate::backend::domain::commands::students::EnrollStudentCommand;
use crate::backend::domain::integrity_service;
use crate::backend::domain::models::student::Student;
use crate::backend::domain::report_service;
use crate::backend::domain::validation;
use crate::backend::Backend;

pub struct Console<'a, R, W> {
    backend: &'a mut Backend,
    prompt: Prompt<R, W>,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(backend: &'a mut Backend, input: R, output: W) -> Self {
        Self {
            backend,
            prompt: Prompt::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Run until the user exits or input ends, then save
    pub fn run(&mut self) -> Result<()> {
        self.welcome()?;

        match self.main_menu() {
            Ok(()) => {}
            Err(e) if e.downcast_ref::<InputClosed>().is_some() => {
                info!("Input closed, leaving the menu");
            }
            Err(e) => return Err(e),
        }

        self.say("\n Final save...")?;
        if let Err(e) = self.backend.save() {
            self.say(&format!(" Save failed: {:#}", e))?;
            return Err(e);
        }
        self.say(" Goodbye!")
    }

    fn say(&mut self, text: &str) -> Result<()> {
        self.prompt.say(text)
    }

    fn welcome(&mut self) -> Result<()> {
        let state = self.backend.school.state();
        let summary = format!(
            "Loaded {} students, {} payment records, {} exam records, {} drive-hour records.",
            state.students.len(),
            state.payments.len(),
            state.exams.len(),
            state.drive_hours.len()
        );
        self.say(&summary)
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            self.say("\n_____________________________________")?;
            self.say("|     DRIVING SCHOOL - RECORDS      |")?;
            self.say("_____________________________________")?;
            self.say("\n1. Students\n2. Payments\n3. Exams\n4. Drive hours")?;
            self.say("5. Data integrity check\n6. Export full report\n7. Save\n0. Exit and save")?;

            match self.prompt.menu_choice()? {
                Some(1) => self.students_menu()?,
                Some(2) => self.payments_menu()?,
                Some(3) => self.exams_menu()?,
                Some(4) => self.drive_hours_menu()?,
                Some(5) => self.integrity_check()?,
                Some(6) => self.export_report()?,
                Some(7) => self.save()?,
                Some(0) => return Ok(()),
                _ => self.say(" Invalid choice.")?,
            }
        }
    }

    fn students_menu(&mut self) -> Result<()> {
        loop {
            self.say("\n------------------------")?;
            self.say("|    STUDENTS          |")?;
            self.say("------------------------")?;
            self.say("\n1. Enroll new student\n2. List students\n3. Find student")?;
            self.say("4. Filter by license category\n5. Filter by status\n0. Back")?;

            match self.prompt.menu_choice()? {
                Some(1) => self.enroll_student()?,
                Some(2) => self.list_students()?,
                Some(3) => self.show_student()?,
                Some(4) => self.filter_by_category()?,
                Some(5) => self.filter_by_status()?,
                Some(0) => return Ok(()),
                _ => self.say(" Invalid choice.")?,
            }
        }
    }

    fn payments_menu(&mut self) -> Result<()> {
        loop {
            self.say("\n------------------------")?;
            self.say("|    PAYMENTS          |")?;
            self.say("------------------------")?;
            self.say("\n1. Register payment\n2. Show payments of a student")?;
            self.say("3. Summary for all students\n4. Export summary as CSV\n0. Back")?;

            match self.prompt.menu_choice()? {
                Some(1) => self.register_payment()?,
                Some(2) => self.show_payments()?,
                Some(3) => self.payment_summary()?,
                Some(4) => self.export_payment_summary()?,
                Some(0) => return Ok(()),
                _ => self.say(" Invalid choice.")?,
            }
        }
    }

    fn exams_menu(&mut self) -> Result<()> {
        loop {
            self.say("\n------------------------")?;
            self.say("|    EXAMS             |")?;
            self.say("------------------------")?;
            self.say("\n1. Record theory attempt\n2. Record practical attempt\n3. Show exam status\n0. Back")?;

            match self.prompt.menu_choice()? {
                Some(1) => self.record_attempt(false)?,
                Some(2) => self.record_attempt(true)?,
                Some(3) => self.show_exams()?,
                Some(0) => return Ok(()),
                _ => self.say(" Invalid choice.")?,
            }
        }
    }

    fn drive_hours_menu(&mut self) -> Result<()> {
        loop {
            self.say("\n------------------------")?;
            self.say("|    DRIVE HOURS       |")?;
            self.say("------------------------")?;
            self.say("\n1. Record drive\n2. Show drive hours\n0. Back")?;

            match self.prompt.menu_choice()? {
                Some(1) => self.record_drive()?,
                Some(2) => self.list_drive_hours()?,
                Some(0) => return Ok(()),
                _ => self.say(" Invalid choice.")?,
            }
        }
    }

    /// Ask for first and last name; `None` after telling the user nothing matched
    fn find_student(&mut self) -> Result<Option<StudentId>> {
        let first_name = self.prompt.non_empty("Student first name: ")?;
        let last_name = self.prompt.non_empty("Student last name: ")?;
        let found = self.backend.school.state().students.find_by_name(&first_name, &last_name);
        if found.is_none() {
            self.say(" Student not found.")?;
        }
        Ok(found)
    }

    fn enroll_student(&mut self) -> Result<()> {
        let first_name = self.prompt.non_empty("First name: ")?;
        let last_name = self.prompt.non_empty("Last name: ")?;
        let fiscal_code = self.prompt.fiscal_code()?;
        let category = self.prompt.category()?;

        let command = EnrollStudentCommand {
            first_name,
            last_name,
            fiscal_code,
            category,
        };
        match self.backend.school.enroll_student(command) {
            Ok(result) => {
                self.say(&format!(" Student enrolled with ID {}.", result.student_id))?;
                if !result.uninitialized.is_empty() {
                    self.say(&format!(
                        " Warning: no {} record could be created.",
                        result.uninitialized.join(", ")
                    ))?;
                }
                Ok(())
            }
            Err(e) => self.say(&format!(" Error: {}", e)),
        }
    }

    fn write_student_line(&mut self, student: &Student) -> Result<()> {
        let line = format!(
            "ID: {} | {} {} | CF: {} | License: {} | Status: {}",
            student.id, student.first_name, student.last_name, student.fiscal_code, student.category, student.status
        );
        self.say(&line)
    }

    fn list_students(&mut self) -> Result<()> {
        let students = self.backend.school.state().students.students().to_vec();
        self.say("\n--- Students ---")?;
        if students.is_empty() {
            return self.say("No students enrolled.");
        }
        for student in &students {
            self.write_student_line(student)?;
        }
        Ok(())
    }

    fn show_student(&mut self) -> Result<()> {
        let Some(id) = self.find_student()? else {
            return Ok(());
        };
        let Some(detail) = report_service::student_detail(self.backend.school.state(), id) else {
            return Ok(());
        };

        self.say("\n--- STUDENT ---")?;
        self.say(&format!(
            "ID: {}\nFirst name: {}\nLast name: {}\nFiscal code: {}\nLicense: {}\nStatus: {}",
            detail.id, detail.first_name, detail.last_name, detail.fiscal_code, detail.category, detail.status
        ))?;
        if let Some(payment) = detail.payment {
            self.say("\n--- PAYMENTS ---")?;
            self.say(&format!(
                "First: {:.2}\nSecond: {:.2}\nThird: {:.2}\nExtra: {:.2}",
                payment.first, payment.second, payment.third, payment.extra
            ))?;
        }
        if let Some(exams) = detail.exams {
            self.say("\n--- EXAMS ---")?;
            self.say(&format!(
                "Theory: {} (passed: {})\nPractical: {} (passed: {})",
                exams.theory_attempts,
                yes_no(exams.theory_passed),
                exams.practical_attempts,
                yes_no(exams.practical_passed)
            ))?;
        }
        let verdict = self.backend.school.eligibility(id);
        self.say(&format!(
            "\nEligible: {}",
            yes_no(verdict.is_eligible())
        ))
    }

    fn filter_by_category(&mut self) -> Result<()> {
        let category: LicenseCategory = self.prompt.category()?;
        let students: Vec<Student> = self
            .backend
            .school
            .state()
            .students
            .filter_by_category(category)
            .into_iter()
            .cloned()
            .collect();

        self.say(&format!("\nStudents with license {}:", category))?;
        if students.is_empty() {
            return self.say("No students found for this category.");
        }
        for student in &students {
            self.write_student_line(student)?;
        }
        Ok(())
    }

    fn filter_by_status(&mut self) -> Result<()> {
        let status = self.prompt.status()?;
        let students: Vec<Student> = self
            .backend
            .school
            .state()
            .students
            .filter_by_status(status)
            .into_iter()
            .cloned()
            .collect();

        self.say(&format!("\nStudents with status '{}':", status))?;
        if students.is_empty() {
            return self.say("No students found with this status.");
        }
        for student in &students {
            self.write_student_line(student)?;
        }
        Ok(())
    }

    fn register_payment(&mut self) -> Result<()> {
        let Some(student_id) = self.find_student()? else {
            return Ok(());
        };

        self.say("1. First installment\n2. Second installment\n3. Third installment\n4. Extra charge")?;
        let number = self
            .prompt
            .parsed("Payment type: ", |n: &u32| validation::is_valid_installment_number(*n))?;
        let Some(slot) = InstallmentSlot::from_number(number) else {
            return Ok(());
        };
        let amount = self.prompt.amount("Amount: ")?;

        let command = RegisterInstallmentCommand {
            student_id,
            slot,
            amount,
        };
        match self.backend.school.register_installment(command) {
            Ok(()) => self.say(" Payment registered."),
            Err(e) => self.say(&format!(" Error: {}", e)),
        }
    }

    fn show_payments(&mut self) -> Result<()> {
        let Some(id) = self.find_student()? else {
            return Ok(());
        };
        let Some(status) = report_service::payment_status(&self.backend.school.state().payments, id) else {
            return self.say(" No payments recorded for this student.");
        };

        self.say(&format!(
            "\nFirst installment:  {:.2}\nSecond installment: {:.2}\nThird installment:  {:.2}\nExtra:              {:.2}",
            status.first, status.second, status.third, status.extra
        ))?;
        self.say(&format!("Total paid: {:.2} EUR", status.total_paid))?;
        if status.remaining_installments <= 0.0 {
            self.say("Installments complete.")
        } else {
            self.say(&format!("{:.2} EUR still due on installments.", status.remaining_installments))
        }
    }

    fn payment_summary(&mut self) -> Result<()> {
        let rows = report_service::payment_summary(self.backend.school.state(), self.backend.settings.extra_hour_rate);

        self.say("\n----- PAYMENT SUMMARY -----")?;
        self.say("ID  | First name      | Last name       | Installments | Extras  | Total paid | Status")?;
        self.say("----|-----------------|-----------------|--------------|---------|------------|----------")?;
        for row in &rows {
            let line = format!(
                "{:<4}| {:<16}| {:<16}| {:<13.2}| {:<8.2}| {:<11.2}| {}",
                row.student_id,
                row.first_name,
                row.last_name,
                row.installments_total,
                row.extras_total,
                row.total_paid,
                if row.complete { "Complete" } else { "Incomplete" }
            );
            self.say(&line)?;
        }
        Ok(())
    }

    fn export_payment_summary(&mut self) -> Result<()> {
        match self.backend.export_payment_summary() {
            Ok(path) => self.say(&format!(" Payment summary written to {}", path.display())),
            Err(e) => {
                warn!("Payment summary export failed: {:#}", e);
                self.say(&format!(" Export failed: {:#}", e))
            }
        }
    }

    fn record_attempt(&mut self, practical: bool) -> Result<()> {
        let Some(student_id) = self.find_student()? else {
            return Ok(());
        };
        let date = self.prompt.date("Exam date (dd mm yyyy, empty for today): ")?;
        let outcome = self.prompt.outcome()?;
        let command = RecordExamAttemptCommand {
            student_id,
            outcome,
            date,
        };

        let result = if practical {
            self.backend.school.record_practical_attempt(command)
        } else {
            self.backend.school.record_theory_attempt(command)
        };
        match result {
            Ok(result) => self.report_attempt(&result),
            Err(e) => self.say(&format!(" Cannot record attempt: {}", e)),
        }
    }

    fn report_attempt(&mut self, result: &ExamAttemptResult) -> Result<()> {
        let attempt = &result.attempt;
        if attempt.passed {
            self.say(&format!(" {} exam passed.", capitalize(&attempt.kind.to_string())))?;
        } else {
            self.say(&format!(
                " {} exam failed. Attempts: {}",
                capitalize(&attempt.kind.to_string()),
                attempt.attempt_number
            ))?;
        }

        if let Some(penalty) = result.penalty {
            let message = match penalty.kind {
                PenaltyKind::Suspension => " Student suspended. The first installment is due again.",
                PenaltyKind::FullRepayment => " Two failed attempts. All installments are due again.",
            };
            self.say(message)?;
            if penalty.kind == PenaltyKind::Suspension && !penalty.status_updated {
                self.say(" Warning: the student status could not be updated.")?;
            }
            if !penalty.installments_reset {
                self.say(" Warning: the payment record could not be updated.")?;
            }
        }
        Ok(())
    }

    fn show_exams(&mut self) -> Result<()> {
        let Some(id) = self.find_student()? else {
            return Ok(());
        };
        let Some(status) = report_service::exam_status(&self.backend.school.state().exams, id) else {
            return self.say(" No exam record for this student.");
        };

        self.say("\n--- EXAM STATUS ---")?;
        self.say(&format!("Student ID: {}", status.student_id))?;
        self.say(&format!(
            "Theory: {} attempt(s) - {}",
            status.theory_attempts,
            passed_label(status.theory_passed)
        ))?;
        for (n, date) in status.theory_dates.iter().enumerate() {
            self.say(&format!(" - Theory attempt {}: {}", n + 1, date))?;
        }
        self.say(&format!(
            "Practical: {} attempt(s) - {}",
            status.practical_attempts,
            passed_label(status.practical_passed)
        ))?;
        for (n, date) in status.practical_dates.iter().enumerate() {
            self.say(&format!(" - Practical attempt {}: {}", n + 1, date))?;
        }
        Ok(())
    }

    fn record_drive(&mut self) -> Result<()> {
        let Some(student_id) = self.find_student()? else {
            return Ok(());
        };
        let hours = self
            .prompt
            .parsed("Hours driven: ", |hours: &u32| validation::is_valid_hours(*hours))?;

        match self.backend.school.add_drive_hours(AddDriveHoursCommand { student_id, hours }) {
            Ok(record) => self.say(&format!(
                " Hours updated. Total: {} | Extra: {}",
                record.total_hours, record.extra_hours
            )),
            Err(e) => self.say(&format!(" Error: {}", e)),
        }
    }

    fn list_drive_hours(&mut self) -> Result<()> {
        let rows = report_service::drive_hours_rows(self.backend.school.state());
        self.say("\n--- DRIVE HOURS ---")?;
        if rows.is_empty() {
            return self.say("No drives recorded.");
        }
        for row in &rows {
            let progress = if row.missing_mandatory == 0 {
                "mandatory hours completed".to_string()
            } else {
                format!("{} hours missing", row.missing_mandatory)
            };
            let line = format!(
                "ID: {} | {} | Total: {} | Extra: {} | {}",
                row.student_id,
                row.student_name.as_deref().unwrap_or("(unknown student)"),
                row.total_hours,
                row.extra_hours,
                progress
            );
            self.say(&line)?;
        }
        Ok(())
    }

    fn integrity_check(&mut self) -> Result<()> {
        let report = integrity_service::check_integrity(self.backend.school.state());

        self.say("\n------------------------------------")?;
        self.say("        DATA INTEGRITY CHECK        ")?;
        self.say("------------------------------------")?;
        for area in [
            shared::IntegrityArea::Students,
            shared::IntegrityArea::Payments,
            shared::IntegrityArea::Exams,
            shared::IntegrityArea::DriveHours,
        ] {
            self.say(&format!("\n---- {} ----", area))?;
            let issues: Vec<String> = report
                .issues_in(area)
                .map(|issue| format!(" Student {}: {}", issue.student_id, issue.message))
                .collect();
            for issue in &issues {
                self.say(issue)?;
            }
            self.say(&format!("Issues found: {}", issues.len()))?;
        }

        if report.is_clean() {
            self.say("\nCheck complete: NO ISSUES")
        } else {
            self.say(&format!("\nCheck complete: {} ISSUES found", report.issues.len()))
        }
    }

    fn export_report(&mut self) -> Result<()> {
        self.say("\n Exporting full report...")?;
        match self.backend.export_report() {
            Ok(path) => self.say(&format!(" Report written to {}", path.display())),
            Err(e) => {
                warn!("Report export failed: {:#}", e);
                self.say(&format!(" Export failed: {:#}", e))
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        self.say("\n Saving data...")?;
        match self.backend.save() {
            Ok(()) => self.say(" Data saved."),
            Err(e) => self.say(&format!(" Save failed: {:#}", e)),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn passed_label(passed: bool) -> &'static str {
    if passed {
        "passed"
    } else {
        "not passed"
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::binary::test_utils::TestEnvironment;
    use crate::backend::domain::commands::exams::PenaltyReport;
    use crate::backend::domain::models::exam::AttemptRecord;
    use shared::{ExamKind, StudentStatus};
    use std::io::Cursor;

    fn run_script(backend: &mut Backend, script: &str) -> String {
        let mut console = Console::new(backend, Cursor::new(script.as_bytes().to_vec()), Vec::new());
        console.run().unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    const ENROLL_MARIO: &str = "1\n1\nMario\nRossi\nRSSMRA85T10A562S\nX\nb\n0\n";

    #[test]
    fn test_enroll_retries_category_and_saves_on_exit() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();

        let out = run_script(&mut backend, &format!("{}0\n", ENROLL_MARIO));
        assert!(out.contains("Invalid value 'X'"));
        assert!(out.contains("Student enrolled with ID 1."));
        assert!(out.contains("Goodbye!"));

        let reopened = Backend::open(env.connection.clone()).unwrap();
        let student = reopened.school.state().students.find_by_id(1).unwrap();
        assert_eq!(student.category, LicenseCategory::B);
    }

    #[test]
    fn test_end_of_input_still_saves() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();

        let out = run_script(&mut backend, ENROLL_MARIO);
        assert!(out.contains("Final save"));
        assert!(env.base_path.join("students.dat").exists());
    }

    #[test]
    fn test_second_theory_failure_through_menu() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();
        let fail_theory = "1\nmario\nrossi\n10 05 2024\nn\n";
        let script = format!("{}3\n{}{}0\n0\n", ENROLL_MARIO, fail_theory, fail_theory);

        let out = run_script(&mut backend, &script);
        assert!(out.contains("Theory exam failed. Attempts: 2"));
        assert!(out.contains("Student suspended"));
        assert_eq!(
            backend.school.state().students.find_by_id(1).unwrap().status,
            StudentStatus::Suspended
        );
    }

    #[test]
    fn test_partial_penalty_warnings() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();
        let mut console = Console::new(&mut backend, Cursor::new(Vec::new()), Vec::new());

        let result = ExamAttemptResult {
            attempt: AttemptRecord {
                kind: ExamKind::Theory,
                attempt_number: 2,
                passed: false,
                exhausted: true,
            },
            penalty: Some(PenaltyReport {
                kind: PenaltyKind::Suspension,
                status_updated: false,
                installments_reset: true,
            }),
        };
        console.report_attempt(&result).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Student suspended"));
        assert!(out.contains("the student status could not be updated"));
        assert!(!out.contains("the payment record could not be updated"));
    }

    #[test]
    fn test_practical_blocked_without_theory() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();
        let script = format!("{}3\n2\nMario\nRossi\n1/6/2024\ny\n0\n0\n", ENROLL_MARIO);

        let out = run_script(&mut backend, &script);
        assert!(out.contains("Cannot record attempt: The theory exam must be passed"));
    }

    #[test]
    fn test_payment_and_drive_flow() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();
        let script = format!(
            "{}2\n1\nMario\nRossi\n3\n100\n1\nMario\nRossi\n2\n250\n0\n4\n1\nMario\nRossi\n8\n2\n0\n0\n",
            ENROLL_MARIO
        );

        let out = run_script(&mut backend, &script);
        assert!(out.contains("Installments must be paid in order"));
        assert!(out.contains("Payment registered."));
        assert!(out.contains("Hours updated. Total: 8 | Extra: 2"));
        assert!(out.contains("Mario Rossi | Total: 8 | Extra: 2 | mandatory hours completed"));
        assert_eq!(backend.school.state().payments.get(1).unwrap().second, 250.0);
    }

    #[test]
    fn test_unknown_student_and_invalid_choice() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();

        let out = run_script(&mut backend, "9\n1\n3\nNobody\nHere\n0\n0\n");
        assert!(out.contains("Invalid choice."));
        assert!(out.contains("Student not found."));
    }

    #[test]
    fn test_integrity_and_export_from_menu() {
        let env = TestEnvironment::new().unwrap();
        let mut backend = Backend::open(env.connection.clone()).unwrap();

        let out = run_script(&mut backend, &format!("{}5\n6\n0\n", ENROLL_MARIO));
        assert!(out.contains("Check complete: NO ISSUES"));
        assert!(out.contains("Report written to"));
        assert!(env.base_path.join("student_report.txt").exists());
    }
}
