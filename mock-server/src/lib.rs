//! Stand-in for the Sihot web-service bridge.
//!
//! Accepts `PUT /res/{action}` with a JSON reservation body. `upsert` answers
//! 200 with the hotel, reservation and sub ids. Validation failures answer 400
//! with an `Error`/`Message` body, and unknown actions answer 404 with the same
//! shape. A repeated upsert for the same `SF_ID` keeps its reservation number.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::put,
    Json, Router,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_HOTEL_ID: &str = "1";

#[derive(Debug, Deserialize)]
pub struct UpsertRequest {
    #[serde(rename = "SF_ID")]
    pub sf_id: String,
    #[serde(rename = "ARR_DATE")]
    pub arr_date: Option<String>,
    #[serde(rename = "DEP_DATE")]
    pub dep_date: Option<String>,
    #[serde(rename = "HOTEL_ID")]
    pub hotel_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResult {
    #[serde(rename = "Sihot_Hotel_Id")]
    pub hotel_id: String,
    #[serde(rename = "Sihot_Res_Id")]
    pub res_id: String,
    #[serde(rename = "Sihot_Sub_Id")]
    pub sub_id: String,
    #[serde(rename = "Sihot_Sync_Timestamp")]
    pub sync_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(rename = "Error")]
    pub error: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl RemoteError {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Reservations {
    last_res_id: u64,
    by_sf_id: HashMap<String, u64>,
}

impl Reservations {
    fn res_id_for(&mut self, sf_id: &str) -> u64 {
        if let Some(id) = self.by_sf_id.get(sf_id) {
            return *id;
        }
        self.last_res_id += 1;
        self.by_sf_id.insert(sf_id.to_string(), self.last_res_id);
        self.last_res_id
    }
}

pub type Db = Arc<RwLock<Reservations>>;

type Reply = Result<Json<UpsertResult>, (StatusCode, Json<RemoteError>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Reservations::default()));
    Router::new()
        .route("/res/{action}", put(res_action))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn res_action(
    State(db): State<Db>,
    Path(action): Path<String>,
    Json(input): Json<UpsertRequest>,
) -> Reply {
    tracing::debug!(%action, sf_id = %input.sf_id, "reservation action");
    if action != "upsert" {
        return Err(reject(
            StatusCode::NOT_FOUND,
            RemoteError::new("UnknownAction", format!("unsupported action {action}")),
        ));
    }

    let (arrival, departure) = validate(&input).map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
    tracing::info!(sf_id = %input.sf_id, %arrival, ?departure, "upserting reservation");

    let res_id = db.write().await.res_id_for(&input.sf_id);
    Ok(Json(UpsertResult {
        hotel_id: input
            .hotel_id
            .unwrap_or_else(|| DEFAULT_HOTEL_ID.to_string()),
        res_id: res_id.to_string(),
        sub_id: "1".to_string(),
        sync_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

fn validate(input: &UpsertRequest) -> Result<(NaiveDate, Option<NaiveDate>), RemoteError> {
    let arrival = match &input.arr_date {
        Some(raw) => parse_date(raw, "ARR_DATE")?,
        None => return Err(RemoteError::new("E_ARR_DATE", "ARR_DATE is missing")),
    };
    let departure = input
        .dep_date
        .as_deref()
        .map(|raw| parse_date(raw, "DEP_DATE"))
        .transpose()?;
    if let Some(departure) = departure {
        if departure < arrival {
            return Err(RemoteError::new(
                "E_DEP_DATE",
                format!("departure {departure} is before arrival {arrival}"),
            ));
        }
    }
    Ok((arrival, departure))
}

fn parse_date(raw: &str, key: &str) -> Result<NaiveDate, RemoteError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| RemoteError::new(&format!("E_{key}"), format!("bad date {raw:?} in {key}")))
}

fn reject(status: StatusCode, error: RemoteError) -> (StatusCode, Json<RemoteError>) {
    tracing::warn!(%status, code = %error.error, message = %error.message, "rejecting request");
    (status, Json(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> UpsertRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn upsert_request_reads_wire_keys() {
        let input = request(r#"{"SF_ID":"r1","ARR_DATE":"2024-05-01","ADULTS":2}"#);
        assert_eq!(input.sf_id, "r1");
        assert_eq!(input.arr_date.as_deref(), Some("2024-05-01"));
        assert!(input.dep_date.is_none());
    }

    #[test]
    fn validate_requires_arrival() {
        let err = validate(&request(r#"{"SF_ID":"r1"}"#)).unwrap_err();
        assert_eq!(err.error, "E_ARR_DATE");
    }

    #[test]
    fn validate_rejects_departure_before_arrival() {
        let input = request(r#"{"SF_ID":"r1","ARR_DATE":"2024-05-08","DEP_DATE":"2024-05-01"}"#);
        let err = validate(&input).unwrap_err();
        assert_eq!(err.error, "E_DEP_DATE");
    }

    #[test]
    fn validate_rejects_unparseable_date() {
        let err = validate(&request(r#"{"SF_ID":"r1","ARR_DATE":"01/05/2024"}"#)).unwrap_err();
        assert_eq!(err.error, "E_ARR_DATE");
        assert!(err.message.contains("01/05/2024"));
    }

    #[test]
    fn reservation_numbers_are_stable_per_record() {
        let mut reservations = Reservations::default();
        let first = reservations.res_id_for("a");
        let second = reservations.res_id_for("b");
        assert_ne!(first, second);
        assert_eq!(reservations.res_id_for("a"), first);
    }

    #[test]
    fn result_serializes_with_remote_keys() {
        let result = UpsertResult {
            hotel_id: "4".to_string(),
            res_id: "1".to_string(),
            sub_id: "1".to_string(),
            sync_timestamp: "2024-05-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["Sihot_Hotel_Id"], "4");
        assert_eq!(json["Sihot_Sync_Timestamp"], "2024-05-01T00:00:00Z");
    }
}
