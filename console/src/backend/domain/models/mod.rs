pub mod student;
pub mod payment;
pub mod exam;
pub mod drive_hours;
pub mod errors;
