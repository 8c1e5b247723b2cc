//! Record-to-JSON mapping for the outbound request body.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::SyncError;
use crate::fields::FieldTable;
use crate::record::ReservationRecord;

/// Ordered JSON object sent as the request body. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SyncRequest {
    fields: Map<String, Value>,
}

impl SyncRequest {
    pub fn get(&self, wire_key: &str) -> Option<&Value> {
        self.fields.get(wire_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compact JSON text of the body.
    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// Builds a [`SyncRequest`] from the outbound rows of
/// [`RESERVATION_FIELDS`](crate::fields::RESERVATION_FIELDS).
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    fields: FieldTable,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_table(fields: FieldTable) -> Self {
        Self { fields }
    }

    /// Map `record` into a request body.
    ///
    /// Absent optional attributes are omitted rather than sent as `null`. A
    /// missing required attribute aborts with
    /// [`SyncError::MissingRequiredField`] naming the wire key.
    pub fn build(&self, record: &ReservationRecord) -> Result<SyncRequest, SyncError> {
        let mut fields = Map::new();
        for spec in self.fields.outbound() {
            match record.get(spec.attribute) {
                Some(value) => {
                    fields.insert(spec.wire_key.to_string(), value.to_json());
                }
                None if spec.required => {
                    return Err(SyncError::MissingRequiredField {
                        field: spec.wire_key.to_string(),
                    });
                }
                None => {}
            }
        }

        let request = SyncRequest { fields };
        debug!(record_id = %record.id, fields = request.len(), "built sync request");
        trace!(body = %request.to_json(), "sync request body");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Direction, RESERVATION_FIELDS};
    use chrono::NaiveDate;

    fn record() -> ReservationRecord {
        ReservationRecord {
            id: "006A000000abc".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            departure_date: NaiveDate::from_ymd_opt(2024, 5, 8),
            adults: Some(2),
            ..ReservationRecord::default()
        }
    }

    #[test]
    fn build_emits_formatted_arrival_date() {
        let req = RequestBuilder::default().build(&record()).unwrap();
        assert_eq!(req.get("ARR_DATE"), Some(&Value::String("2024-05-01".to_string())));
        assert_eq!(req.get("DEP_DATE"), Some(&Value::String("2024-05-08".to_string())));
        assert_eq!(req.get("ADULTS"), Some(&Value::from(2)));
    }

    #[test]
    fn build_omits_absent_optional_fields() {
        let req = RequestBuilder::default().build(&record()).unwrap();
        assert!(req.get("HOTEL_ID").is_none());
        assert!(req.get("NOTE").is_none());
        assert!(!req.to_json().contains("null"));
    }

    #[test]
    fn build_keeps_table_order() {
        let mut rec = record();
        rec.note = Some("late arrival".to_string());
        rec.hotel_id = Some("4".to_string());
        let req = RequestBuilder::default().build(&rec).unwrap();
        let keys: Vec<_> = req.keys().collect();
        assert_eq!(keys, ["SF_ID", "ARR_DATE", "DEP_DATE", "HOTEL_ID", "ADULTS", "NOTE"]);
        assert!(req.to_json().starts_with(r#"{"SF_ID":"006A000000abc","ARR_DATE":"2024-05-01""#));
    }

    #[test]
    fn build_without_arrival_date_fails() {
        let mut rec = record();
        rec.arrival_date = None;
        let err = RequestBuilder::default().build(&rec).unwrap_err();
        assert!(matches!(
            err,
            SyncError::MissingRequiredField { ref field } if field == "ARR_DATE"
        ));
    }

    #[test]
    fn build_without_id_fails() {
        let mut rec = record();
        rec.id.clear();
        let err = RequestBuilder::default().build(&rec).unwrap_err();
        assert!(matches!(
            err,
            SyncError::MissingRequiredField { ref field } if field == "SF_ID"
        ));
    }

    #[test]
    fn body_only_uses_outbound_reservation_keys() {
        let mut rec = record();
        rec.resort = Some("H1".to_string());
        rec.sihot_res_id = Some("9".to_string());
        let req = RequestBuilder::new().build(&rec).unwrap();
        let outbound: Vec<_> = RESERVATION_FIELDS
            .iter()
            .filter(|spec| spec.direction == Direction::Outbound)
            .map(|spec| spec.wire_key)
            .collect();
        assert!(req.keys().all(|key| outbound.contains(&key)));
        assert!(req.get("Sihot_Hotel_Id").is_none());
        assert!(req.get("ARR_DATE").is_some());
    }

    #[test]
    fn every_built_body_carries_arrival_date() {
        let minimal = ReservationRecord {
            id: "r1".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..ReservationRecord::default()
        };
        for rec in [minimal, record()] {
            let req = RequestBuilder::new().build(&rec).unwrap();
            assert!(!req.is_empty());
            assert!(req.get("ARR_DATE").is_some(), "{rec:?}");
        }
    }

    #[test]
    fn serializes_as_plain_object() {
        let req = RequestBuilder::default().build(&record()).unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["SF_ID"], "006A000000abc");
    }
}
