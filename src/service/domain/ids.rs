//! Identifier type for persisted service records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a service record.
///
/// Identifiers are unique per service kind; the pair of kind and identifier
/// forms a [`super::ServiceRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRecordId(i64);

impl ServiceRecordId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ServiceRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
