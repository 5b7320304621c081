//! # Storage Layer
//!
//! Binary record files for the four registries, the YAML settings file and
//! the coordinator that loads and saves the whole school state.

pub mod binary;
pub mod settings_repository;
pub mod store;
pub mod traits;

pub use binary::DataConnection;
pub use settings_repository::{SchoolSettings, SettingsRepository};
pub use store::SchoolStore;
pub use traits::RecordStorage;
