//! Database row structs.
//!
//! Each row type derives `FromRow` and converts into the matching
//! `vitalwatch_core` domain type. Conversions that can fail report
//! [`StoreError::Malformed`](vitalwatch_core::store::StoreError::Malformed).

pub mod alert;
pub mod patient;
pub mod vital_reading;
