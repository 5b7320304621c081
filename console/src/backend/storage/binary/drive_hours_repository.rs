use std::io::{Read, Write};

use super::codec::{read_u32, write_u32, CodecError, RecordCodec};
use super::record_file::RecordFile;
use crate::backend::domain::models::drive_hours::DriveHours;

pub type DriveHoursRepository = RecordFile<DriveHours>;

impl RecordCodec for DriveHours {
    const FILE_NAME: &'static str = "drive_hours.dat";
    const RECORD_SIZE: usize = 12;

    fn encode<W: Write>(&self, out: &mut W) -> Result<(), CodecError> {
        write_u32(out, "student id", self.student_id)?;
        write_u32(out, "total hours", self.total_hours)?;
        write_u32(out, "extra hours", self.extra_hours)
    }

    fn decode<R: Read>(input: &mut R) -> Result<Self, CodecError> {
        Ok(Self {
            student_id: read_u32(input, "student id")?,
            total_hours: read_u32(input, "total hours")?,
            extra_hours: read_u32(input, "extra hours")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::binary::codec::decode_file;
    use crate::backend::storage::binary::test_utils::TestEnvironment;
    use crate::backend::storage::traits::RecordStorage;

    #[test]
    fn test_save_and_load() {
        let env = TestEnvironment::new().unwrap();
        let repo = DriveHoursRepository::new(env.connection.clone());
        let records = vec![
            DriveHours { student_id: 4, total_hours: 9, extra_hours: 3 },
            DriveHours::new(1),
        ];

        repo.save_records(&records).unwrap();
        assert_eq!(repo.load_records().unwrap().unwrap(), records);
    }

    #[test]
    fn test_negative_hours_are_corrupt() {
        let mut bytes = 1i32.to_le_bytes().to_vec();
        for value in [1i32, -2, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        assert!(matches!(
            decode_file::<DriveHours>(&bytes),
            Err(CodecError::NegativeValue { field: "total hours", value: -2 })
        ));
    }
}
