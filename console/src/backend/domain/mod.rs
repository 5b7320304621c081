//! Domain layer for the driving school.
//!
//! The four registries (`StudentRegistry`, `PaymentLedger`, `ExamTracker`,
//! `DriveHoursTracker`) each own one kind of record keyed by student ID.
//! Events that touch more than one registry go through the free functions
//! in `school_service`, which take the affected registries explicitly.
//! Reports and the integrity check only read.

pub mod commands;
pub mod drive_hours_tracker;
pub mod exam_tracker;
pub mod export_service;
pub mod integrity_service;
pub mod models;
pub mod payment_ledger;
pub mod record_table;
pub mod report_service;
pub mod school_service;
pub mod student_registry;
pub mod validation;

pub use drive_hours_tracker::DriveHoursTracker;
pub use exam_tracker::ExamTracker;
pub use export_service::ExportService;
pub use payment_ledger::PaymentLedger;
pub use school_service::{SchoolService, SchoolState};
pub use student_registry::StudentRegistry;
