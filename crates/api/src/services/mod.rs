//! Business services sitting between handlers / live sessions and the store.

pub mod alerts;
pub mod patients;

pub use alerts::{AlertService, ProcessReport};
pub use patients::PatientService;
