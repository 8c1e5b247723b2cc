//! Stateless reservation upsert client.
//!
//! # Design
//! `SyncClient` holds only the endpoint; the field mapping is the fixed
//! reservation table. `build_upsert` produces an `HttpRequest`,
//! `parse_upsert` consumes an `HttpResponse`, and `sync` runs both around a
//! [`Transport`]. Callers that execute the HTTP
//! round-trip themselves can use the two halves directly.

use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::record::ReservationRecord;
use crate::request::RequestBuilder;
use crate::response::ResponseHandler;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct SyncClient {
    endpoint: String,
    builder: RequestBuilder,
    handler: ResponseHandler,
}

impl SyncClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            builder: RequestBuilder::new(),
            handler: ResponseHandler::new(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;
        Ok(Self::new(config.endpoint.trim()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_upsert(&self, record: &ReservationRecord) -> Result<HttpRequest, SyncError> {
        let body = self.builder.build(record)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_json(),
        })
    }

    pub fn parse_upsert(
        &self,
        response: &HttpResponse,
        record: &ReservationRecord,
    ) -> Result<ReservationRecord, SyncError> {
        self.handler.handle(response.status, &response.body, record)
    }

    /// Full round-trip for one record. Nothing is retried; the first error is
    /// returned and `record` is left as it was.
    pub fn sync<T>(
        &self,
        transport: &T,
        record: &ReservationRecord,
    ) -> Result<ReservationRecord, SyncError>
    where
        T: Transport + ?Sized,
    {
        info!(record_id = %record.id, endpoint = %self.endpoint, "syncing reservation");

        let request = self.build_upsert(record)?;
        let response = transport.send(&request)?;
        debug!(record_id = %record.id, status = response.status, "received sync response");

        let result = self.parse_upsert(&response, record);
        match &result {
            Ok(updated) => {
                info!(record_id = %record.id, resort = ?updated.resort, "reservation synced")
            }
            Err(SyncError::RemoteRejected { status, code, message }) => {
                warn!(record_id = %record.id, status, %code, %message, "remote rejected reservation")
            }
            Err(err) => warn!(record_id = %record.id, error = %err, "reservation sync failed"),
        }
        result
    }
}
