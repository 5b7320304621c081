//! # Binary Storage Module
//!
//! Flat binary files, one per registry, in the data directory:
//!
//! ```text
//! data/
//! ├── students.dat
//! ├── payments.dat
//! ├── exams.dat
//! ├── drive_hours.dat
//! └── autoscuola.yaml
//! ```
//!
//! Each `.dat` file is a little-endian `i32` record count followed by the
//! packed fixed-size records (see [`codec`]). There is no version header
//! and no checksum. Files are replaced atomically on save.

pub mod codec;
pub mod connection;
pub mod drive_hours_repository;
pub mod exam_repository;
pub mod payment_repository;
pub mod record_file;
pub mod student_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::DataConnection;
pub use drive_hours_repository::DriveHoursRepository;
pub use exam_repository::ExamRepository;
pub use payment_repository::PaymentRepository;
pub use record_file::RecordFile;
pub use student_repository::StudentRepository;
