//! Line-oriented prompts over any `BufRead`/`Write` pair.
//!
//! Malformed input is reported and asked again. End of input surfaces as an
//! [`InputClosed`] error so the menu loop can shut down cleanly.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::str::FromStr;

use shared::{ExamDate, ExamOutcome, LicenseCategory, StudentStatus};

use crate::backend::domain::validation;

#[derive(Debug, thiserror::Error)]
#[error("input closed")]
pub struct InputClosed;

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// One trimmed line
    pub fn line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(buf.trim().to_string())
    }

    /// Re-asks until the line is not blank
    pub fn non_empty(&mut self, label: &str) -> Result<String> {
        loop {
            let value = self.line(label)?;
            if validation::is_non_empty(&value) {
                return Ok(value);
            }
            self.say(" Value cannot be empty.")?;
        }
    }

    /// Re-asks until the line parses and passes `accept`
    pub fn parsed<T: FromStr>(&mut self, label: &str, accept: impl Fn(&T) -> bool) -> Result<T> {
        loop {
            let raw = self.line(label)?;
            match raw.parse::<T>() {
                Ok(value) if accept(&value) => return Ok(value),
                _ => self.say(&format!(" Invalid value '{}'.", raw))?,
            }
        }
    }

    /// Re-asks until the raw text passes `check`, then parses it
    fn checked<T: FromStr>(&mut self, label: &str, check: fn(&str) -> bool) -> Result<T> {
        loop {
            let raw = self.line(label)?;
            if check(&raw) {
                if let Ok(value) = raw.parse::<T>() {
                    return Ok(value);
                }
            }
            self.say(&format!(" Invalid value '{}'.", raw))?;
        }
    }

    pub fn menu_choice(&mut self) -> Result<Option<u32>> {
        let raw = self.line("Choice: ")?;
        Ok(raw.parse().ok())
    }

    pub fn category(&mut self) -> Result<LicenseCategory> {
        let labels: Vec<&str> = LicenseCategory::ALL.iter().map(|c| c.as_str()).collect();
        let label = format!("License category ({}): ", labels.join(", "));
        self.checked(&label, validation::is_valid_category)
    }

    pub fn status(&mut self) -> Result<StudentStatus> {
        self.checked("Status (enrolled/suspended): ", validation::is_valid_status)
    }

    pub fn fiscal_code(&mut self) -> Result<String> {
        loop {
            let code = self.line("Fiscal code: ")?.to_ascii_uppercase();
            if validation::is_valid_fiscal_code(&code) {
                return Ok(code);
            }
            self.say(" Invalid fiscal code (expected e.g. RSSMRA85T10A562S).")?;
        }
    }

    /// `dd mm yyyy` or `dd/mm/yyyy`; an empty line means today
    pub fn date(&mut self, label: &str) -> Result<ExamDate> {
        loop {
            let raw = self.line(label)?;
            if raw.is_empty() {
                return Ok(ExamDate::today());
            }
            let parts: Vec<u32> = raw
                .split(|c: char| c == '/' || c == '-' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse().ok())
                .collect();

            if let [day, month, year] = parts[..] {
                if validation::is_valid_date(day, month, year) {
                    return Ok(ExamDate::new(day, month, year));
                }
            }
            self.say(" Invalid date.")?;
        }
    }

    pub fn outcome(&mut self) -> Result<ExamOutcome> {
        loop {
            match self.line("Passed? (y/n): ")?.to_ascii_lowercase().as_str() {
                "y" | "yes" | "1" => return Ok(ExamOutcome::Passed),
                "n" | "no" | "0" => return Ok(ExamOutcome::Failed),
                _ => self.say(" Answer y or n.")?,
            }
        }
    }

    pub fn amount(&mut self, label: &str) -> Result<f64> {
        self.parsed(label, |amount: &f64| validation::is_valid_amount(*amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_category_is_asked_until_valid() {
        let mut p = prompt("C\n\nam\n");
        assert_eq!(p.category().unwrap(), LicenseCategory::AM);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Invalid value").count(), 2);
    }

    #[test]
    fn test_status_is_asked_until_valid() {
        let mut p = prompt("active\nSuspended\n");
        assert_eq!(p.status().unwrap(), StudentStatus::Suspended);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Invalid value 'active'"));
    }

    #[test]
    fn test_date_formats() {
        let mut p = prompt("31 04 2024\n1/2/2024\n");
        assert_eq!(p.date("Date: ").unwrap(), ExamDate::new(1, 2, 2024));

        let mut p = prompt("5 6 2025\n");
        assert_eq!(p.date("Date: ").unwrap(), ExamDate::new(5, 6, 2025));
    }

    #[test]
    fn test_amount_rejects_negative() {
        let mut p = prompt("-3\nabc\n120.5\n");
        assert_eq!(p.amount("Amount: ").unwrap(), 120.5);
    }

    #[test]
    fn test_end_of_input() {
        let mut p = prompt("");
        let err = p.line("> ").unwrap_err();
        assert!(err.downcast_ref::<InputClosed>().is_some());
    }

    #[test]
    fn test_fiscal_code_uppercased() {
        let mut p = prompt("bad\nrssmra85t10a562s\n");
        assert_eq!(p.fiscal_code().unwrap(), "RSSMRA85T10A562S");
    }
}
