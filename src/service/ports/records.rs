//! Writer and reader ports for service records.
//!
//! Writers only ever run inside a storage transaction owned by the task
//! lifecycle store, which is why [`ServiceRecordWriter`] is synchronous;
//! reads run on their own.

use crate::service::domain::{HttpServiceRecord, HttpServiceSpec, ServiceRecordId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for service record store operations.
pub type ServiceStoreResult<T> = Result<T, ServiceStoreError>;

/// Insert-only access to service record collections.
pub trait ServiceRecordWriter {
    /// Persists an HTTP service record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceStoreError::Persistence`] when the write fails.
    fn insert_http_record(
        &mut self,
        spec: &HttpServiceSpec,
        created_at: DateTime<Utc>,
    ) -> ServiceStoreResult<ServiceRecordId>;
}

/// Lookup access to service record collections.
#[async_trait]
pub trait ServiceRecordReader: Send + Sync {
    /// Finds an HTTP service record by identifier.
    ///
    /// Returns `None` when no record exists.
    async fn find_http_record(
        &self,
        id: ServiceRecordId,
    ) -> ServiceStoreResult<Option<HttpServiceRecord>>;

    /// Finds the HTTP service records with the given identifiers in one
    /// lookup.
    ///
    /// Identifiers without a record are skipped. The order of the returned
    /// records is unspecified.
    async fn find_http_records(
        &self,
        ids: &[ServiceRecordId],
    ) -> ServiceStoreResult<Vec<HttpServiceRecord>>;
}

/// Errors returned by service record store implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
