//! Records of external service invocations attached to task transitions.
//!
//! A service record captures a call the caller already made (currently only
//! HTTP). Records know nothing about the transition log: a transition refers
//! to a record through a polymorphic `(kind, id)` pair, and the dispatch in
//! [`services`] maps each kind to its writer and lookup.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Kind dispatch in [`services`]

pub mod domain;
pub mod ports;
pub mod services;
