//! Status classification and response-to-record mapping.
//!
//! # Design
//! The body is parsed into exactly one [`ResponsePayload`] variant before the
//! record is touched. Only status 200 is a success; every other status reads
//! the body as an `Error`/`Message` pair. `handle` borrows the input record and
//! returns an updated copy, so a failed call cannot leave a half-applied
//! record behind.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::fields::FieldTable;
use crate::record::{Attribute, FieldValue, ReservationRecord};

/// Inbound values of a 200 response, already coerced to attribute kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPayload {
    values: Vec<(Attribute, FieldValue)>,
}

/// Body of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "Error", deserialize_with = "scalar_as_string")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Success(SuccessPayload),
    Error(ErrorPayload),
}

impl SuccessPayload {
    pub fn values(&self) -> &[(Attribute, FieldValue)] {
        &self.values
    }

    pub fn get(&self, attribute: Attribute) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(attr, _)| *attr == attribute)
            .map(|(_, value)| value)
    }

    /// Copy of `record` with every parsed value assigned.
    ///
    /// Values are coerced to their attribute's kind while parsing, so every
    /// assignment matches.
    pub fn apply_to(&self, record: &ReservationRecord) -> ReservationRecord {
        let mut updated = record.clone();
        for (attribute, value) in &self.values {
            let assigned = updated.set(*attribute, value.clone());
            debug_assert!(assigned.is_ok(), "{assigned:?}");
        }
        updated
    }
}

/// Applies or reports the remote response, driven by the inbound rows of
/// [`RESERVATION_FIELDS`](crate::fields::RESERVATION_FIELDS).
#[derive(Debug, Clone, Default)]
pub struct ResponseHandler {
    fields: FieldTable,
}

impl ResponseHandler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_table(fields: FieldTable) -> Self {
        Self { fields }
    }

    /// Parse `body` into the payload variant selected by `status`.
    pub fn classify(&self, status: u16, body: &str) -> Result<ResponsePayload, SyncError> {
        if status == 200 {
            self.parse_success(body).map(ResponsePayload::Success)
        } else {
            parse_error(body).map(ResponsePayload::Error)
        }
    }

    /// Return `record` updated from a successful response, or the error the
    /// response describes. `record` itself is never modified.
    pub fn handle(
        &self,
        status: u16,
        body: &str,
        record: &ReservationRecord,
    ) -> Result<ReservationRecord, SyncError> {
        match self.classify(status, body)? {
            ResponsePayload::Success(payload) => {
                debug!(record_id = %record.id, fields = payload.values.len(), "applying sync response");
                Ok(payload.apply_to(record))
            }
            ResponsePayload::Error(payload) => Err(SyncError::RemoteRejected {
                status,
                code: payload.code,
                message: payload.message,
            }),
        }
    }

    fn parse_success(&self, body: &str) -> Result<SuccessPayload, SyncError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|err| SyncError::malformed(err.to_string(), body))?;
        let Value::Object(object) = value else {
            return Err(SyncError::malformed("expected a JSON object", body));
        };

        let mut values = Vec::new();
        for spec in self.fields.inbound() {
            match object.get(spec.wire_key) {
                None | Some(Value::Null) if spec.required => {
                    return Err(SyncError::malformed(
                        format!("missing required key {}", spec.wire_key),
                        body,
                    ));
                }
                None | Some(Value::Null) => {}
                Some(raw) => {
                    let value = FieldValue::from_json(spec.kind(), raw).ok_or_else(|| {
                        SyncError::malformed(
                            format!("{} is not a valid {:?} value", spec.wire_key, spec.kind()),
                            body,
                        )
                    })?;
                    values.push((spec.attribute, value));
                }
            }
        }
        Ok(SuccessPayload { values })
    }
}

fn parse_error(body: &str) -> Result<ErrorPayload, SyncError> {
    serde_json::from_str(body).map_err(|err| SyncError::malformed(err.to_string(), body))
}

/// Remote error codes are usually strings but some installations send numbers.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    })
}
