//! In-memory adapters for task lifecycle tests.

mod store;

pub use store::InMemoryLifecycleStore;
