//! `PostgreSQL` adapters for task lifecycle persistence.

mod models;
mod repository;
mod schema;

pub use repository::{LifecyclePgPool, PostgresLifecycleStore};
