//! HTTP request and response described as plain data.
//!
//! # Design
//! `SyncClient` builds an `HttpRequest` and parses an `HttpResponse` without
//! touching the network. A [`Transport`](crate::transport::Transport)
//! executes the actual round-trip in between, which keeps building and parsing
//! deterministic and easy to test.

/// HTTP method for a request. The upsert endpoint only takes `PUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Put => "PUT",
        }
    }
}

/// An HTTP request with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status and body returned by the remote service. Non-2xx statuses are data
/// here, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
