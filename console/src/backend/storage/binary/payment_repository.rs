use std::io::{Read, Write};

use super::codec::{read_f64, read_u32, write_f64, write_u32, CodecError, RecordCodec};
use super::record_file::RecordFile;
use crate::backend::domain::models::payment::Payment;

pub type PaymentRepository = RecordFile<Payment>;

/// Student id followed by the three installments and the extra charge
impl RecordCodec for Payment {
    const FILE_NAME: &'static str = "payments.dat";
    const RECORD_SIZE: usize = 4 + 4 * 8;

    fn encode<W: Write>(&self, out: &mut W) -> Result<(), CodecError> {
        write_u32(out, "student id", self.student_id)?;
        write_f64(out, self.first)?;
        write_f64(out, self.second)?;
        write_f64(out, self.third)?;
        write_f64(out, self.extra)
    }

    fn decode<R: Read>(input: &mut R) -> Result<Self, CodecError> {
        Ok(Self {
            student_id: read_u32(input, "student id")?,
            first: read_f64(input)?,
            second: read_f64(input)?,
            third: read_f64(input)?,
            extra: read_f64(input)?,
        })
    }
}
