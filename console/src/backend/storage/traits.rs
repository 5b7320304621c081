//! Storage abstraction used by the persistence coordinator.
//!
//! The school state only needs to be loaded once at startup and written back
//! on save, so each registry is persisted as a whole.

use anyhow::Result;

/// Bulk persistence of one registry
pub trait RecordStorage<R> {
    /// `Ok(None)` when there is no prior data
    fn load_records(&self) -> Result<Option<Vec<R>>>;

    /// Replace the stored records, keeping their order
    fn save_records(&self, records: &[R]) -> Result<()>;

    /// Human-readable location used in error messages
    fn location(&self) -> String;
}
