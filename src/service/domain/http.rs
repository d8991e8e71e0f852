//! HTTP service records.

use super::{ParseHttpMethodError, ServiceDomainError, ServiceRecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use url::{Host, Url};

/// HTTP method used for an upstream call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `GET` request.
    Get,
    /// `POST` request, the default when no method is supplied.
    #[default]
    Post,
    /// `PUT` request.
    Put,
    /// `DELETE` request.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = ParseHttpMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            _ => Err(ParseHttpMethodError(value.to_owned())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated upstream URL of an HTTP service call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamUrl(String);

impl UpstreamUrl {
    /// Maximum URL length accepted by the service record schema.
    pub const MAX_LENGTH: usize = 200;

    const ALLOWED_SCHEMES: [&'static str; 4] = ["http", "https", "ftp", "ftps"];

    /// Creates a validated upstream URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::MissingUpstreamUrl`] for blank input,
    /// [`ServiceDomainError::UpstreamUrlTooLong`] above
    /// [`Self::MAX_LENGTH`] characters, and
    /// [`ServiceDomainError::InvalidUpstreamUrl`] when the value is not an
    /// absolute `http`, `https`, `ftp` or `ftps` URL whose host is an IP
    /// address, `localhost`, or a dotted domain name.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceDomainError::MissingUpstreamUrl);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ServiceDomainError::UpstreamUrlTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }

        let parsed = Url::parse(trimmed)
            .map_err(|_| ServiceDomainError::InvalidUpstreamUrl(trimmed.to_owned()))?;
        let is_valid =
            Self::ALLOWED_SCHEMES.contains(&parsed.scheme()) && Self::is_routable(parsed.host());
        if !is_valid {
            return Err(ServiceDomainError::InvalidUpstreamUrl(trimmed.to_owned()));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the URL as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts IP addresses, `localhost`, and dotted domain names.
    fn is_routable(host: Option<Host<&str>>) -> bool {
        match host {
            Some(Host::Domain(domain)) => {
                domain == "localhost"
                    || domain
                        .split('.')
                        .filter(|label| !label.is_empty())
                        .count()
                        > 1
            }
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
            None => false,
        }
    }
}

impl AsRef<str> for UpstreamUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UpstreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire shape of an HTTP `service` object.
#[derive(Debug, Deserialize)]
struct HttpServicePayload {
    upstream_url: Option<String>,
    method: Option<String>,
    headers: Option<Value>,
    #[serde(rename = "dataIn")]
    data_in: Option<Value>,
    #[serde(rename = "dataOut")]
    data_out: Option<Value>,
}

/// Validated HTTP service call that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServiceSpec {
    upstream_url: UpstreamUrl,
    method: HttpMethod,
    headers: Option<Value>,
    data_in: Option<Value>,
    data_out: Option<Value>,
}

impl HttpServiceSpec {
    /// Creates a spec for the given URL using the default method.
    #[must_use]
    pub fn new(upstream_url: UpstreamUrl) -> Self {
        Self {
            upstream_url,
            method: HttpMethod::default(),
            headers: None,
            data_in: None,
            data_out: None,
        }
    }

    /// Decodes and validates an HTTP `service` object.
    ///
    /// The `type` discriminator and unknown members are ignored; kind
    /// selection happens before this call.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::MalformedPayload`] when a member has the
    /// wrong JSON type, and the [`UpstreamUrl`] or [`HttpMethod`] validation
    /// errors for invalid values.
    pub fn from_json(value: &Value) -> Result<Self, ServiceDomainError> {
        let payload = HttpServicePayload::deserialize(value)
            .map_err(|err| ServiceDomainError::MalformedPayload(err.to_string()))?;

        let upstream_url = UpstreamUrl::new(
            payload
                .upstream_url
                .ok_or(ServiceDomainError::MissingUpstreamUrl)?,
        )?;
        let method = payload
            .method
            .as_deref()
            .map(HttpMethod::try_from)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            upstream_url,
            method,
            headers: payload.headers,
            data_in: payload.data_in,
            data_out: payload.data_out,
        })
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the request payload.
    #[must_use]
    pub fn with_data_in(mut self, data_in: Value) -> Self {
        self.data_in = Some(data_in);
        self
    }

    /// Sets the response payload.
    #[must_use]
    pub fn with_data_out(mut self, data_out: Value) -> Self {
        self.data_out = Some(data_out);
        self
    }

    /// Returns the upstream URL.
    #[must_use]
    pub const fn upstream_url(&self) -> &UpstreamUrl {
        &self.upstream_url
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request headers, if any.
    #[must_use]
    pub const fn headers(&self) -> Option<&Value> {
        self.headers.as_ref()
    }

    /// Returns the request payload, if any.
    #[must_use]
    pub const fn data_in(&self) -> Option<&Value> {
        self.data_in.as_ref()
    }

    /// Returns the response payload, if any.
    #[must_use]
    pub const fn data_out(&self) -> Option<&Value> {
        self.data_out.as_ref()
    }
}

/// Persisted HTTP service record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServiceRecord {
    id: ServiceRecordId,
    spec: HttpServiceSpec,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted HTTP service record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHttpServiceData {
    /// Persisted record identifier.
    pub id: ServiceRecordId,
    /// Persisted upstream URL.
    pub upstream_url: UpstreamUrl,
    /// Persisted HTTP method.
    pub method: HttpMethod,
    /// Persisted request headers.
    pub headers: Option<Value>,
    /// Persisted request payload.
    pub data_in: Option<Value>,
    /// Persisted response payload.
    pub data_out: Option<Value>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl HttpServiceRecord {
    /// Binds a validated spec to its store-assigned identifier.
    #[must_use]
    pub const fn from_spec(
        id: ServiceRecordId,
        spec: HttpServiceSpec,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            spec,
            created_at,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHttpServiceData) -> Self {
        Self {
            id: data.id,
            spec: HttpServiceSpec {
                upstream_url: data.upstream_url,
                method: data.method,
                headers: data.headers,
                data_in: data.data_in,
                data_out: data.data_out,
            },
            created_at: data.created_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceRecordId {
        self.id
    }

    /// Returns the recorded call.
    #[must_use]
    pub const fn spec(&self) -> &HttpServiceSpec {
        &self.spec
    }

    /// Returns the upstream URL.
    #[must_use]
    pub const fn upstream_url(&self) -> &UpstreamUrl {
        self.spec.upstream_url()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.spec.method()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
