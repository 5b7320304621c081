use std::io::{Read, Write};

use shared::ExamDate;

use super::codec::{read_bool, read_u32, write_bool, write_u32, CodecError, RecordCodec};
use super::record_file::RecordFile;
use crate::backend::domain::models::exam::{Exam, ExamAttempts, MAX_ATTEMPTS};

pub type ExamRepository = RecordFile<Exam>;

fn write_date<W: Write>(out: &mut W, date: &ExamDate) -> Result<(), CodecError> {
    write_u32(out, "day", date.day)?;
    write_u32(out, "month", date.month)?;
    write_u32(out, "year", date.year)
}

fn read_date<R: Read>(input: &mut R) -> Result<ExamDate, CodecError> {
    Ok(ExamDate {
        day: read_u32(input, "day")?,
        month: read_u32(input, "month")?,
        year: read_u32(input, "year")?,
    })
}

fn read_dates<R: Read>(input: &mut R) -> Result<[ExamDate; MAX_ATTEMPTS as usize], CodecError> {
    let mut dates = [ExamDate::default(); MAX_ATTEMPTS as usize];
    for date in dates.iter_mut() {
        *date = read_date(input)?;
    }
    Ok(dates)
}

/// Counts and flags first, then both theory dates and both practical dates
impl RecordCodec for Exam {
    const FILE_NAME: &'static str = "exams.dat";
    const RECORD_SIZE: usize = 5 * 4 + 2 * MAX_ATTEMPTS as usize * 12;

    fn encode<W: Write>(&self, out: &mut W) -> Result<(), CodecError> {
        write_u32(out, "student id", self.student_id)?;
        write_u32(out, "theory attempts", self.theory.attempts)?;
        write_u32(out, "practical attempts", self.practical.attempts)?;
        write_bool(out, self.theory.passed)?;
        write_bool(out, self.practical.passed)?;
        for date in self.theory.dates.iter().chain(self.practical.dates.iter()) {
            write_date(out, date)?;
        }
        Ok(())
    }

    fn decode<R: Read>(input: &mut R) -> Result<Self, CodecError> {
        let student_id = read_u32(input, "student id")?;
        let theory_attempts = read_u32(input, "theory attempts")?;
        let practical_attempts = read_u32(input, "practical attempts")?;
        let theory_passed = read_bool(input)?;
        let practical_passed = read_bool(input)?;
        let theory_dates = read_dates(input)?;
        let practical_dates = read_dates(input)?;

        Ok(Self {
            student_id,
            theory: ExamAttempts {
                attempts: theory_attempts,
                passed: theory_passed,
                dates: theory_dates,
            },
            practical: ExamAttempts {
                attempts: practical_attempts,
                passed: practical_passed,
                dates: practical_dates,
            },
        })
    }
}
