//! Selection and validation of the optional `service` request member.

use super::{RequestValidationError, TaskLifecycleError, TaskLifecycleResult};
use crate::config::LifecycleConfig;
use crate::service::domain::{HttpServiceSpec, ServiceKind, ServiceSpec};
use serde_json::Value;

/// Validates the raw `service` member of a request.
///
/// Returns `Ok(None)` when the member is absent.
///
/// # Errors
///
/// - [`TaskLifecycleError::Request`] when the member is not an object,
///   including `null`.
/// - [`TaskLifecycleError::UnknownService`] when `type` is missing or not
///   enabled in `config`.
/// - [`TaskLifecycleError::UnsupportedService`] when `type` is enabled but
///   has no record implementation.
/// - [`TaskLifecycleError::Service`] when a kind-specific field is invalid.
pub fn validate_service_spec(
    service: Option<&Value>,
    config: &LifecycleConfig,
) -> TaskLifecycleResult<Option<ServiceSpec>> {
    let Some(value) = service else {
        return Ok(None);
    };
    let Some(members) = value.as_object() else {
        return Err(RequestValidationError::ServiceNotAnObject.into());
    };

    let requested = members.get("type").and_then(Value::as_str);
    let Some(kind_name) = requested.filter(|name| config.is_enabled(name)) else {
        return Err(TaskLifecycleError::UnknownService(
            requested.map(str::to_owned),
        ));
    };
    let kind = ServiceKind::try_from(kind_name)
        .map_err(|_| TaskLifecycleError::UnsupportedService(kind_name.to_owned()))?;

    let spec = match kind {
        ServiceKind::Http => ServiceSpec::Http(HttpServiceSpec::from_json(value)?),
    };
    Ok(Some(spec))
}
