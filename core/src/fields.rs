//! Declarative mapping between record attributes and wire keys.
//!
//! # Design
//! Both `RequestBuilder` and `ResponseHandler` walk the same table, so adding
//! a synchronized field is an edit of [`RESERVATION_FIELDS`]. The table is
//! fixed at compile time; callers cannot swap it, so `ARR_DATE` is always
//! sent and `Sihot_Hotel_Id` is always demanded. The value kind of a row is
//! taken from its attribute, never declared twice.

use crate::record::{Attribute, FieldKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Record attribute written into the request body.
    Outbound,
    /// Response key written back onto the record.
    Inbound,
}

/// One row of a field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub attribute: Attribute,
    pub wire_key: &'static str,
    pub direction: Direction,
    pub required: bool,
}

impl FieldSpec {
    pub const fn outbound(attribute: Attribute, wire_key: &'static str) -> Self {
        Self {
            attribute,
            wire_key,
            direction: Direction::Outbound,
            required: false,
        }
    }

    pub const fn inbound(attribute: Attribute, wire_key: &'static str) -> Self {
        Self {
            attribute,
            wire_key,
            direction: Direction::Inbound,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.attribute.kind()
    }
}

/// Reservation upsert fields of the Sihot web-service bridge.
pub const RESERVATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::outbound(Attribute::Id, "SF_ID").required(),
    FieldSpec::outbound(Attribute::ArrivalDate, "ARR_DATE").required(),
    FieldSpec::outbound(Attribute::DepartureDate, "DEP_DATE"),
    FieldSpec::outbound(Attribute::HotelId, "HOTEL_ID"),
    FieldSpec::outbound(Attribute::RoomCategory, "ROOM_CAT"),
    FieldSpec::outbound(Attribute::Adults, "ADULTS"),
    FieldSpec::outbound(Attribute::Children, "CHILDREN"),
    FieldSpec::outbound(Attribute::Note, "NOTE"),
    FieldSpec::inbound(Attribute::Resort, "Sihot_Hotel_Id").required(),
    FieldSpec::inbound(Attribute::SihotResId, "Sihot_Res_Id"),
    FieldSpec::inbound(Attribute::SihotSubId, "Sihot_Sub_Id"),
    FieldSpec::inbound(Attribute::LastSync, "Sihot_Sync_Timestamp"),
];

/// An ordered list of [`FieldSpec`] rows. Row order is the key order of the
/// request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    specs: Vec<FieldSpec>,
}

impl FieldTable {
    pub fn reservation() -> Self {
        Self {
            specs: RESERVATION_FIELDS.to_vec(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_specs(specs: Vec<FieldSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn outbound(&self) -> impl Iterator<Item = &FieldSpec> {
        self.with_direction(Direction::Outbound)
    }

    pub fn inbound(&self) -> impl Iterator<Item = &FieldSpec> {
        self.with_direction(Direction::Inbound)
    }

    fn with_direction(&self, direction: Direction) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter().filter(move |spec| spec.direction == direction)
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::reservation()
    }
}
