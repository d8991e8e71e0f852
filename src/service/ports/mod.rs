//! Port contracts for service record persistence.

pub mod records;

pub use records::{ServiceRecordReader, ServiceRecordWriter, ServiceStoreError, ServiceStoreResult};
