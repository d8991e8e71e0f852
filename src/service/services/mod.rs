//! Dispatch from service kinds to their record writers and lookups.

mod dispatch;

pub use dispatch::{persist_service, resolve_service, resolve_services};
