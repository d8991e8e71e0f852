//! Adapter implementations of the task lifecycle store port.
//!
//! - [`memory`]: process-local store used by tests and embedders
//! - [`postgres`]: Diesel-backed `PostgreSQL` store

pub mod memory;
pub mod postgres;
