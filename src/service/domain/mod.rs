//! Domain model for service records.

mod error;
mod http;
mod ids;
mod kind;

pub use error::{ParseHttpMethodError, ParseServiceKindError, ServiceDomainError};
pub use http::{
    HttpMethod, HttpServiceRecord, HttpServiceSpec, PersistedHttpServiceData, UpstreamUrl,
};
pub use ids::ServiceRecordId;
pub use kind::{ServiceKind, ServiceRecord, ServiceRef, ServiceSpec};
