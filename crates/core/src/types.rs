/// Patients are keyed by an opaque, externally assigned string id (e.g. `P006`).
pub type PatientId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
