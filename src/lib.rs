//! Stateward: task state and transition-log engine.
//!
//! Tasks move between lifecycle states. Every move is appended to an ordered
//! history and may carry the record of the external service call that
//! caused it. Writes for one operation are committed atomically.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`task`]: Tasks, transition logs, and the lifecycle coordinator
//! - [`service`]: Service call records and kind dispatch
//! - [`config`]: Layered runtime settings
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod logging;
pub mod service;
pub mod task;
