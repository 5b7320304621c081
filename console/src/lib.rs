//! Record manager for a driving school: students, payments, exams and drive
//! hours, persisted to flat binary files in the data directory.

pub mod backend;
