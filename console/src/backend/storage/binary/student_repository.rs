//! Student records: id, first name, last name, fiscal code, license
//! category and status, 106 bytes each.

use std::io::{Read, Write};

use shared::{LicenseCategory, StudentStatus};

use super::codec::{read_text, read_u32, write_text, write_u32, CodecError, RecordCodec};
use super::record_file::RecordFile;
use crate::backend::domain::models::student::Student;

const NAME_WIDTH: usize = 30;
const FISCAL_CODE_WIDTH: usize = 17;
const CATEGORY_WIDTH: usize = 5;
const STATUS_WIDTH: usize = 20;

pub type StudentRepository = RecordFile<Student>;

impl RecordCodec for Student {
    const FILE_NAME: &'static str = "students.dat";
    const RECORD_SIZE: usize = 4 + 2 * NAME_WIDTH + FISCAL_CODE_WIDTH + CATEGORY_WIDTH + STATUS_WIDTH;

    fn encode<W: Write>(&self, out: &mut W) -> Result<(), CodecError> {
        write_u32(out, "id", self.id)?;
        write_text(out, "first name", &self.first_name, NAME_WIDTH)?;
        write_text(out, "last name", &self.last_name, NAME_WIDTH)?;
        write_text(out, "fiscal code", &self.fiscal_code, FISCAL_CODE_WIDTH)?;
        write_text(out, "category", self.category.as_str(), CATEGORY_WIDTH)?;
        write_text(out, "status", self.status.as_str(), STATUS_WIDTH)
    }

    fn decode<R: Read>(input: &mut R) -> Result<Self, CodecError> {
        let id = read_u32(input, "id")?;
        let first_name = read_text(input, "first name", NAME_WIDTH)?;
        let last_name = read_text(input, "last name", NAME_WIDTH)?;
        let fiscal_code = read_text(input, "fiscal code", FISCAL_CODE_WIDTH)?;

        let category_text = read_text(input, "category", CATEGORY_WIDTH)?;
        let category = category_text
            .parse::<LicenseCategory>()
            .map_err(|_| CodecError::UnknownValue {
                field: "category",
                value: category_text,
            })?;

        let status_text = read_text(input, "status", STATUS_WIDTH)?;
        let status = status_text
            .parse::<StudentStatus>()
            .map_err(|_| CodecError::UnknownValue {
                field: "status",
                value: status_text,
            })?;

        Ok(Self {
            id,
            first_name,
            last_name,
            fiscal_code,
            category,
            status,
        })
    }
}
