pub mod alerts;
pub mod patients;
