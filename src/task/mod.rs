//! Task lifecycle tracking.
//!
//! A task carries a current state and an append-only log of every state it
//! was moved to. Each log entry may reference the service record of the call
//! that triggered it. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
