//! Service kinds and the polymorphic reference from transitions to records.

use super::{HttpServiceRecord, HttpServiceSpec, ParseServiceKindError, ServiceRecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of external service a transition may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// An HTTP call.
    Http,
}

impl ServiceKind {
    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
        }
    }
}

impl TryFrom<&str> for ServiceKind {
    type Error = ParseServiceKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "http" => Ok(Self::Http),
            _ => Err(ParseServiceKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a transition log entry to one service record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRef {
    kind: ServiceKind,
    id: ServiceRecordId,
}

impl ServiceRef {
    /// Creates a reference to the record `id` of the given kind.
    #[must_use]
    pub const fn new(kind: ServiceKind, id: ServiceRecordId) -> Self {
        Self { kind, id }
    }

    /// Returns the record kind.
    #[must_use]
    pub const fn kind(self) -> ServiceKind {
        self.kind
    }

    /// Returns the record identifier within its kind.
    #[must_use]
    pub const fn id(self) -> ServiceRecordId {
        self.id
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Validated service payload awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSpec {
    /// HTTP call payload.
    Http(HttpServiceSpec),
}

impl ServiceSpec {
    /// Returns the kind of record this spec produces.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        match self {
            Self::Http(_) => ServiceKind::Http,
        }
    }
}

/// Persisted service record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRecord {
    /// HTTP call record.
    Http(HttpServiceRecord),
}

impl ServiceRecord {
    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        match self {
            Self::Http(_) => ServiceKind::Http,
        }
    }

    /// Returns the reference that points at this record.
    #[must_use]
    pub const fn service_ref(&self) -> ServiceRef {
        match self {
            Self::Http(record) => ServiceRef::new(ServiceKind::Http, record.id()),
        }
    }
}
