//! Kind-to-collection dispatch for service records.
//!
//! Each [`ServiceKind`] maps to exactly one writer and one lookup on the
//! store ports. Adding a kind extends the matches below and never touches
//! the transition log.

use crate::service::{
    domain::{ServiceKind, ServiceRecord, ServiceRef, ServiceSpec},
    ports::{ServiceRecordReader, ServiceRecordWriter, ServiceStoreResult},
};
use chrono::{DateTime, Utc};

/// Persists a validated service payload and returns the reference to it.
///
/// # Errors
///
/// Propagates the writer's [`crate::service::ports::ServiceStoreError`].
pub fn persist_service<W>(
    spec: &ServiceSpec,
    writer: &mut W,
    created_at: DateTime<Utc>,
) -> ServiceStoreResult<ServiceRef>
where
    W: ServiceRecordWriter + ?Sized,
{
    match spec {
        ServiceSpec::Http(http) => {
            let id = writer.insert_http_record(http, created_at)?;
            Ok(ServiceRef::new(ServiceKind::Http, id))
        }
    }
}

/// Looks up the record a reference points at.
///
/// Returns `Ok(None)` for a dangling reference so history reads never fail
/// because a record is missing.
///
/// # Errors
///
/// Propagates the reader's [`crate::service::ports::ServiceStoreError`].
pub async fn resolve_service<R>(
    reader: &R,
    service_ref: ServiceRef,
) -> ServiceStoreResult<Option<ServiceRecord>>
where
    R: ServiceRecordReader + ?Sized,
{
    match service_ref.kind() {
        ServiceKind::Http => Ok(reader
            .find_http_record(service_ref.id())
            .await?
            .map(ServiceRecord::Http)),
    }
}

/// Looks up the records behind many references with one lookup per kind.
///
/// Dangling references are skipped; callers key the result by
/// [`ServiceRecord::service_ref`].
///
/// # Errors
///
/// Propagates the reader's [`crate::service::ports::ServiceStoreError`].
pub async fn resolve_services<R>(
    reader: &R,
    references: &[ServiceRef],
) -> ServiceStoreResult<Vec<ServiceRecord>>
where
    R: ServiceRecordReader + ?Sized,
{
    let mut http_ids = Vec::new();
    for reference in references {
        match reference.kind() {
            ServiceKind::Http => http_ids.push(reference.id()),
        }
    }
    http_ids.sort_unstable();
    http_ids.dedup();

    let mut records = Vec::with_capacity(http_ids.len());
    if !http_ids.is_empty() {
        records.extend(
            reader
                .find_http_records(&http_ids)
                .await?
                .into_iter()
                .map(ServiceRecord::Http),
        );
    }
    Ok(records)
}
