use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;

use super::codec::{decode_file, encode_file, RecordCodec};
use super::connection::DataConnection;
use crate::backend::storage::traits::RecordStorage;

/// One binary data file holding every record of type `T`
#[derive(Debug, Clone)]
pub struct RecordFile<T> {
    connection: DataConnection,
    _record: PhantomData<T>,
}

impl<T: RecordCodec> RecordFile<T> {
    pub fn new(connection: DataConnection) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    pub fn file_name(&self) -> &'static str {
        T::FILE_NAME
    }
}

impl<T: RecordCodec> RecordStorage<T> for RecordFile<T> {
    fn load_records(&self) -> Result<Option<Vec<T>>> {
        let path = self.connection.file_path(T::FILE_NAME);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };

        let records = decode_file::<T>(&data).with_context(|| format!("Corrupt data file {}", path.display()))?;
        info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Some(records))
    }

    fn save_records(&self, records: &[T]) -> Result<()> {
        let bytes = encode_file(records).with_context(|| format!("Failed to encode {}", T::FILE_NAME))?;
        self.connection.write_atomic(T::FILE_NAME, &bytes)?;
        info!("Saved {} records to {}", records.len(), T::FILE_NAME);
        Ok(())
    }

    fn location(&self) -> String {
        self.connection.file_path(T::FILE_NAME).display().to_string()
    }
}
