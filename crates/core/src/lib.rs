//! Domain layer for the vitals monitoring backend.
//!
//! Everything in this crate is free of database and HTTP concerns:
//!
//! - [`types`]: shared identifier and timestamp aliases.
//! - [`patient`], [`vitals`], [`alert`]: the data model.
//! - [`thresholds`]: the pure threshold evaluation engine.
//! - [`validation`]: input checks applied before any store call.
//! - [`store`]: the storage contract implemented by `vitalwatch-db`.

pub mod alert;
pub mod error;
pub mod patient;
pub mod store;
pub mod thresholds;
pub mod types;
pub mod validation;
pub mod vitals;
