use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::time_range::TimeRange;
use crate::models::wire::{hh_mm, opaque_id};

/// Owner-declared window during which a turf cannot be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedInterval {
    #[serde(deserialize_with = "opaque_id::deserialize")]
    pub id: String,
    #[serde(rename = "turfId", deserialize_with = "opaque_id::deserialize")]
    pub resource_id: String,
    #[serde(rename = "blockedDate")]
    pub date: NaiveDate,
    #[serde(rename = "startTime", with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(rename = "endTime", with = "hh_mm")]
    pub end: NaiveTime,
    #[serde(rename = "turfName", default, skip_serializing_if = "Option::is_none")]
    pub turf_name: Option<String>,
}

impl BlockedInterval {
    pub fn overlaps(&self, range: &TimeRange) -> bool {
        range.overlaps_span(self.date, self.start, self.end)
    }
}

/// Body of the create/update blocked-slot requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlockedInterval {
    #[serde(rename = "turfId")]
    pub resource_id: String,
    #[serde(rename = "blockedDate")]
    pub date: NaiveDate,
    #[serde(rename = "startTime", with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(rename = "endTime", with = "hh_mm")]
    pub end: NaiveTime,
}

impl NewBlockedInterval {
    pub fn new(resource_id: &str, range: &TimeRange) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            date: range.date(),
            start: range.start(),
            end: range.end(),
        }
    }
}
