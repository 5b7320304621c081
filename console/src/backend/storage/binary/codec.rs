//! Fixed-size little-endian record codec.
//!
//! A data file is a 4-byte record count followed by `count` packed records
//! of `RECORD_SIZE` bytes each. Integers are `i32`, amounts `f64`, and text
//! fields are NUL-padded UTF-8 of a fixed width (the last byte is always
//! NUL, so a field of width N holds at most N - 1 bytes).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Size of the leading record count
pub const COUNT_SIZE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("file too short: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    #[error("file holds {got} bytes but {count} records need {expected}")]
    LengthMismatch { count: usize, expected: usize, got: usize },
    #[error("negative record count {0}")]
    NegativeCount(i32),
    #[error("negative value {value} in field '{field}'")]
    NegativeValue { field: &'static str, value: i32 },
    #[error("value {value} does not fit field '{field}'")]
    ValueOutOfRange { field: &'static str, value: u64 },
    #[error("field '{field}' is not valid UTF-8")]
    InvalidText { field: &'static str },
    #[error("field '{field}' holds {len} bytes, at most {max} fit")]
    TextTooLong { field: &'static str, len: usize, max: usize },
    #[error("field '{field}' has unknown value '{value}'")]
    UnknownValue { field: &'static str, value: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A record with a fixed on-disk layout
pub trait RecordCodec: Sized {
    /// Name of the file holding these records
    const FILE_NAME: &'static str;
    const RECORD_SIZE: usize;

    fn encode<W: Write>(&self, out: &mut W) -> Result<(), CodecError>;
    fn decode<R: Read>(input: &mut R) -> Result<Self, CodecError>;
}

pub fn encode_file<T: RecordCodec>(records: &[T]) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(COUNT_SIZE + records.len() * T::RECORD_SIZE);
    let count = i32::try_from(records.len()).map_err(|_| CodecError::ValueOutOfRange {
        field: "record count",
        value: records.len() as u64,
    })?;

    buf.write_i32::<LittleEndian>(count)?;
    for record in records {
        record.encode(&mut buf)?;
    }
    Ok(buf)
}

pub fn decode_file<T: RecordCodec>(data: &[u8]) -> Result<Vec<T>, CodecError> {
    if data.len() < COUNT_SIZE {
        return Err(CodecError::Truncated {
            expected: COUNT_SIZE,
            got: data.len(),
        });
    }

    let mut cursor = Cursor::new(data);
    let raw_count = cursor.read_i32::<LittleEndian>()?;
    if raw_count < 0 {
        return Err(CodecError::NegativeCount(raw_count));
    }

    let count = raw_count as usize;
    let expected = COUNT_SIZE + count * T::RECORD_SIZE;
    if data.len() != expected {
        return Err(CodecError::LengthMismatch {
            count,
            expected,
            got: data.len(),
        });
    }

    (0..count).map(|_| T::decode(&mut cursor)).collect()
}

pub fn write_u32<W: Write>(out: &mut W, field: &'static str, value: u32) -> Result<(), CodecError> {
    let value = i32::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
        field,
        value: u64::from(value),
    })?;
    out.write_i32::<LittleEndian>(value)?;
    Ok(())
}

/// Read an `i32` that must not be negative
pub fn read_u32<R: Read>(input: &mut R, field: &'static str) -> Result<u32, CodecError> {
    let value = input.read_i32::<LittleEndian>()?;
    u32::try_from(value).map_err(|_| CodecError::NegativeValue { field, value })
}

pub fn write_bool<W: Write>(out: &mut W, value: bool) -> Result<(), CodecError> {
    out.write_i32::<LittleEndian>(i32::from(value))?;
    Ok(())
}

/// Any non-zero value reads as true
pub fn read_bool<R: Read>(input: &mut R) -> Result<bool, CodecError> {
    Ok(input.read_i32::<LittleEndian>()? != 0)
}

pub fn write_f64<W: Write>(out: &mut W, value: f64) -> Result<(), CodecError> {
    out.write_f64::<LittleEndian>(value)?;
    Ok(())
}

pub fn read_f64<R: Read>(input: &mut R) -> Result<f64, CodecError> {
    Ok(input.read_f64::<LittleEndian>()?)
}

pub fn write_text<W: Write>(out: &mut W, field: &'static str, value: &str, width: usize) -> Result<(), CodecError> {
    let bytes = value.as_bytes();
    if bytes.len() >= width {
        return Err(CodecError::TextTooLong {
            field,
            len: bytes.len(),
            max: width - 1,
        });
    }

    let mut padded = vec![0u8; width];
    padded[..bytes.len()].copy_from_slice(bytes);
    out.write_all(&padded)?;
    Ok(())
}

/// Text up to the first NUL
pub fn read_text<R: Read>(input: &mut R, field: &'static str, width: usize) -> Result<String, CodecError> {
    let mut buf = vec![0u8; width];
    input.read_exact(&mut buf)?;

    let end = buf.iter().position(|&b| b == 0).unwrap_or(width);
    buf.truncate(end);
    String::from_utf8(buf).map_err(|_| CodecError::InvalidText { field })
}
