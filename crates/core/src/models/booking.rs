use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::time_range::TimeRange;
use crate::models::wire::{hh_mm, opaque_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "opaque_id::deserialize")]
    pub id: String,
    #[serde(rename = "turfId", deserialize_with = "opaque_id::deserialize")]
    pub resource_id: String,
    #[serde(rename = "userId", deserialize_with = "opaque_id::deserialize")]
    pub requester_id: String,
    #[serde(rename = "bookingDate")]
    pub date: NaiveDate,
    #[serde(rename = "slotStartTime", with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(rename = "slotEndTime", with = "hh_mm")]
    pub end: NaiveTime,
    pub status: BookingStatus,
    #[serde(rename = "totalPrice", default)]
    pub total_price: f64,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    pub fn overlaps(&self, range: &TimeRange) -> bool {
        range.overlaps_span(self.date, self.start, self.end)
    }
}

/// Body of the create-booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    #[serde(rename = "turfId")]
    pub resource_id: String,
    #[serde(rename = "userId")]
    pub requester_id: String,
    #[serde(rename = "bookingDate")]
    pub date: NaiveDate,
    #[serde(rename = "slotStartTime", with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(rename = "slotEndTime", with = "hh_mm")]
    pub end: NaiveTime,
    pub status: BookingStatus,
}

impl NewBooking {
    pub fn new(resource_id: &str, requester_id: &str, range: &TimeRange) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            requester_id: requester_id.to_string(),
            date: range.date(),
            start: range.start(),
            end: range.end(),
            status: BookingStatus::Confirmed,
        }
    }
}
