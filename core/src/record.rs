//! The reservation record synchronized with the remote service.
//!
//! # Design
//! `ReservationRecord` is a plain owned struct. Field-addressable access goes
//! through [`Attribute`] so the field table can drive both directions of the
//! mapping without per-field code. Every attribute has one fixed
//! [`FieldKind`], and values cross the table as [`FieldValue`].

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire representation of dates, both directions.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A reservation opportunity as held by the CRM record store.
///
/// The first block of fields is sent to the remote service, the second block
/// is written back from a successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationRecord {
    pub id: String,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub hotel_id: Option<String>,
    pub room_category: Option<String>,
    pub adults: Option<i64>,
    pub children: Option<i64>,
    pub note: Option<String>,

    pub resort: Option<String>,
    pub sihot_res_id: Option<String>,
    pub sihot_sub_id: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Names every attribute of [`ReservationRecord`] that a field table can map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Id,
    ArrivalDate,
    DepartureDate,
    HotelId,
    RoomCategory,
    Adults,
    Children,
    Note,
    Resort,
    SihotResId,
    SihotSubId,
    LastSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Timestamp,
}

/// A scalar value read from or written to a record attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Number(i64),
    Timestamp(DateTime<Utc>),
}

/// Returned by [`ReservationRecord::set`] when the value's kind does not match
/// the attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute {attribute:?} expects {expected:?}, got {value:?}")]
pub struct KindMismatch {
    pub attribute: Attribute,
    pub expected: FieldKind,
    pub value: FieldValue,
}

impl Attribute {
    pub fn kind(self) -> FieldKind {
        match self {
            Attribute::ArrivalDate | Attribute::DepartureDate => FieldKind::Date,
            Attribute::Adults | Attribute::Children => FieldKind::Number,
            Attribute::LastSync => FieldKind::Timestamp,
            Attribute::Id
            | Attribute::HotelId
            | Attribute::RoomCategory
            | Attribute::Note
            | Attribute::Resort
            | Attribute::SihotResId
            | Attribute::SihotSubId => FieldKind::Text,
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
        }
    }

    /// Render as the JSON scalar the remote service expects.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::Number(n) => Value::from(*n),
            FieldValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }

    /// Coerce a JSON value into `kind`. Returns `None` when the value cannot
    /// represent that kind.
    ///
    /// Text accepts numbers too, since hotel and reservation ids are numeric
    /// on some remote installations.
    pub fn from_json(kind: FieldKind, value: &Value) -> Option<FieldValue> {
        match (kind, value) {
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            (FieldKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(FieldValue::Date),
            (FieldKind::Number, Value::Number(n)) => n.as_i64().map(FieldValue::Number),
            (FieldKind::Number, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(FieldValue::Number)
            }
            (FieldKind::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc))),
            _ => None,
        }
    }
}

impl ReservationRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Read an attribute. An empty `id` counts as absent.
    pub fn get(&self, attribute: Attribute) -> Option<FieldValue> {
        match attribute {
            Attribute::Id => (!self.id.is_empty()).then(|| FieldValue::Text(self.id.clone())),
            Attribute::ArrivalDate => self.arrival_date.map(FieldValue::Date),
            Attribute::DepartureDate => self.departure_date.map(FieldValue::Date),
            Attribute::HotelId => self.hotel_id.clone().map(FieldValue::Text),
            Attribute::RoomCategory => self.room_category.clone().map(FieldValue::Text),
            Attribute::Adults => self.adults.map(FieldValue::Number),
            Attribute::Children => self.children.map(FieldValue::Number),
            Attribute::Note => self.note.clone().map(FieldValue::Text),
            Attribute::Resort => self.resort.clone().map(FieldValue::Text),
            Attribute::SihotResId => self.sihot_res_id.clone().map(FieldValue::Text),
            Attribute::SihotSubId => self.sihot_sub_id.clone().map(FieldValue::Text),
            Attribute::LastSync => self.last_sync.map(FieldValue::Timestamp),
        }
    }

    /// Write an attribute. The record is untouched when the kinds disagree.
    pub fn set(&mut self, attribute: Attribute, value: FieldValue) -> Result<(), KindMismatch> {
        match (attribute, value) {
            (Attribute::Id, FieldValue::Text(s)) => self.id = s,
            (Attribute::ArrivalDate, FieldValue::Date(d)) => self.arrival_date = Some(d),
            (Attribute::DepartureDate, FieldValue::Date(d)) => self.departure_date = Some(d),
            (Attribute::HotelId, FieldValue::Text(s)) => self.hotel_id = Some(s),
            (Attribute::RoomCategory, FieldValue::Text(s)) => self.room_category = Some(s),
            (Attribute::Adults, FieldValue::Number(n)) => self.adults = Some(n),
            (Attribute::Children, FieldValue::Number(n)) => self.children = Some(n),
            (Attribute::Note, FieldValue::Text(s)) => self.note = Some(s),
            (Attribute::Resort, FieldValue::Text(s)) => self.resort = Some(s),
            (Attribute::SihotResId, FieldValue::Text(s)) => self.sihot_res_id = Some(s),
            (Attribute::SihotSubId, FieldValue::Text(s)) => self.sihot_sub_id = Some(s),
            (Attribute::LastSync, FieldValue::Timestamp(ts)) => self.last_sync = Some(ts),
            (attribute, value) => {
                return Err(KindMismatch {
                    attribute,
                    expected: attribute.kind(),
                    value,
                })
            }
        }
        Ok(())
    }
}
