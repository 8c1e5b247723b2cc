//! Error types for the reservation sync adapter.
//!
//! # Design
//! Each variant is terminal for one invocation: nothing is retried or
//! recovered inside the crate. `MalformedResponse` keeps the raw body so the
//! caller can log exactly what the remote sent. `RemoteRejected` carries the
//! remote `Error`/`Message` pair verbatim.

/// Fieldless discriminant of [`SyncError`], for callers that only branch on
/// the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequiredField,
    TransportFailure,
    MalformedResponse,
    RemoteRejected,
    RecordNotFound,
    InvalidConfig,
}

/// Errors returned by request building, transport, and response handling.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A field marked required in the field table has no value on the record.
    /// Raised before any network call.
    #[error("missing required field {field}")]
    MissingRequiredField { field: String },

    /// Network unreachable, timeout, TLS failure, or an unreadable body.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The response body does not have the expected JSON shape.
    #[error("malformed response ({reason}): {body}")]
    MalformedResponse { reason: String, body: String },

    /// The remote service answered with an `Error`/`Message` body.
    #[error("remote rejected request (HTTP {status}): {code}: {message}")]
    RemoteRejected {
        status: u16,
        code: String,
        message: String,
    },

    /// The record store has no record with this id.
    #[error("record {id} not found")]
    RecordNotFound { id: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            SyncError::TransportFailure(_) => ErrorKind::TransportFailure,
            SyncError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            SyncError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            SyncError::RecordNotFound { .. } => ErrorKind::RecordNotFound,
            SyncError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>, body: &str) -> Self {
        SyncError::MalformedResponse {
            reason: reason.into(),
            body: body.to_string(),
        }
    }
}

impl From<ureq::Error> for SyncError {
    fn from(err: ureq::Error) -> Self {
        SyncError::TransportFailure(err.to_string())
    }
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = SyncError::RemoteRejected {
            status: 400,
            code: "E1".to_string(),
            message: "bad date".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::RemoteRejected);
        assert_eq!(
            SyncError::TransportFailure("refused".to_string()).kind(),
            ErrorKind::TransportFailure
        );
    }

    #[test]
    fn display_includes_remote_code_and_message() {
        let err = SyncError::RemoteRejected {
            status: 400,
            code: "E1".to_string(),
            message: "bad date".to_string(),
        };
        assert_eq!(err.to_string(), "remote rejected request (HTTP 400): E1: bad date");
    }

    #[test]
    fn malformed_keeps_raw_body() {
        let err = SyncError::malformed("expected a JSON object", "not json");
        match err {
            SyncError::MalformedResponse { body, .. } => assert_eq!(body, "not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
