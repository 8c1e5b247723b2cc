//! Blocking transport boundary and its `ureq` implementation.

use std::time::Duration;

use tracing::debug;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations return every HTTP status as an [`HttpResponse`] and fail
/// with [`SyncError::TransportFailure`] when no complete response was
/// received. A body that arrived but is not UTF-8 text is
/// [`SyncError::MalformedResponse`].
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SyncError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SyncError> {
        (**self).send(request)
    }
}

/// [`Transport`] backed by a `ureq` agent.
///
/// The agent is configured so 4xx/5xx responses come back as data and the
/// status interpretation stays with `ResponseHandler`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::with_timeout(config.timeout())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SyncError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Put => self.agent.put(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send(request.body.as_bytes())?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response.body_mut().read_to_vec()?;
        let body = String::from_utf8(bytes).map_err(|err| {
            SyncError::malformed(
                format!("HTTP {status} body is not UTF-8"),
                &String::from_utf8_lossy(err.as_bytes()),
            )
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
