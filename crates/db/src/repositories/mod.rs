//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod patient_repo;
pub mod vital_reading_repo;

pub use alert_repo::AlertRepo;
pub use patient_repo::PatientRepo;
pub use vital_reading_repo::VitalReadingRepo;
