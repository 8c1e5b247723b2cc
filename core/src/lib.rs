//! Synchronous reservation sync adapter for the Sihot web-service bridge.
//!
//! # Overview
//! Maps a CRM reservation record into a JSON `PUT` body, sends it through a
//! blocking [`Transport`], and applies the JSON response back onto a copy of
//! the record. Status 200 carries the result fields; every other status
//! carries an `Error`/`Message` pair that is surfaced as
//! [`SyncError::RemoteRejected`].
//!
//! # Design
//! - `SyncClient` is stateless. It holds only the endpoint.
//! - `build_upsert` and `parse_upsert` are pure, so the I/O boundary is
//!   explicit and both halves are testable without a network.
//! - One fixed, declarative table ([`RESERVATION_FIELDS`]) drives both the
//!   request and the response mapping.
//! - A record is only ever updated from a fully parsed success payload.

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod http;
pub mod record;
pub mod request;
pub mod response;
pub mod store;
pub mod transport;

pub use client::SyncClient;
pub use config::SyncConfig;
pub use error::{ErrorKind, SyncError};
pub use fields::{Direction, FieldSpec, FieldTable, RESERVATION_FIELDS};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use record::{Attribute, FieldKind, FieldValue, ReservationRecord};
pub use request::{RequestBuilder, SyncRequest};
pub use response::{ErrorPayload, ResponseHandler, ResponsePayload, SuccessPayload};
pub use store::{sync_record, MemoryStore, RecordStore};
pub use transport::{Transport, UreqTransport};
