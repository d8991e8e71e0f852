//! Request payloads accepted by the lifecycle service.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding a request body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    /// The body is not a JSON object.
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// A required member is missing or has the wrong JSON type.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The `service` member is present but is not a JSON object.
    #[error("service must be an object")]
    ServiceNotAnObject,
}

/// Request to create a task in its initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    identifier: String,
    state: String,
    service: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CreateTaskBody {
    #[serde(alias = "task_name")]
    name: String,
    #[serde(alias = "task_identifier")]
    identifier: String,
    state: String,
    #[serde(default, deserialize_with = "present_member")]
    service: Option<Value>,
}

impl CreateTaskRequest {
    /// Creates a request without a service payload.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            state: state.into(),
            service: None,
        }
    }

    /// Attaches a raw `service` member.
    #[must_use]
    pub fn with_service(mut self, service: Value) -> Self {
        self.service = Some(service);
        self
    }

    /// Decodes a JSON request body.
    ///
    /// `task_name` and `task_identifier` are accepted in place of `name`
    /// and `identifier`. A `service` member set to `null` counts as
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::NotAnObject`] for a non-object body
    /// and [`RequestValidationError::MalformedBody`] when a required member
    /// is missing or not a string.
    pub fn from_body(body: &Value) -> Result<Self, RequestValidationError> {
        if !body.is_object() {
            return Err(RequestValidationError::NotAnObject);
        }
        let decoded = CreateTaskBody::deserialize(body)
            .map_err(|err| RequestValidationError::MalformedBody(err.to_string()))?;
        Ok(Self {
            name: decoded.name,
            identifier: decoded.identifier,
            state: decoded.state,
            service: decoded.service,
        })
    }

    /// Returns the raw task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw external identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the raw initial state.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the raw `service` member, if present.
    #[must_use]
    pub const fn service(&self) -> Option<&Value> {
        self.service.as_ref()
    }
}

/// Request to move a task to another state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStateRequest {
    state: String,
    service: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChangeStateBody {
    state: String,
    #[serde(default, deserialize_with = "present_member")]
    service: Option<Value>,
}

impl ChangeStateRequest {
    /// Creates a request without a service payload.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            service: None,
        }
    }

    /// Attaches a raw `service` member.
    #[must_use]
    pub fn with_service(mut self, service: Value) -> Self {
        self.service = Some(service);
        self
    }

    /// Decodes a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::NotAnObject`] for a non-object body
    /// and [`RequestValidationError::MalformedBody`] when `state` is missing
    /// or not a string.
    pub fn from_body(body: &Value) -> Result<Self, RequestValidationError> {
        if !body.is_object() {
            return Err(RequestValidationError::NotAnObject);
        }
        let decoded = ChangeStateBody::deserialize(body)
            .map_err(|err| RequestValidationError::MalformedBody(err.to_string()))?;
        Ok(Self {
            state: decoded.state,
            service: decoded.service,
        })
    }

    /// Returns the raw target state.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the raw `service` member, if present.
    #[must_use]
    pub const fn service(&self) -> Option<&Value> {
        self.service.as_ref()
    }
}

/// Keeps an explicit `null` distinguishable from an absent member.
fn present_member<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
