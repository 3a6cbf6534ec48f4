use std::{fmt, str::FromStr};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::time_range::TimeRange;
use crate::models::wire::{hh_mm, opaque_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportType {
    Football,
    Cricket,
    Badminton,
    Tennis,
    Basketball,
    Volleyball,
    Hockey,
    Futsal,
}

impl SportType {
    pub const ALL: [SportType; 8] = [
        SportType::Football,
        SportType::Cricket,
        SportType::Badminton,
        SportType::Tennis,
        SportType::Basketball,
        SportType::Volleyball,
        SportType::Hockey,
        SportType::Futsal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Football => "FOOTBALL",
            SportType::Cricket => "CRICKET",
            SportType::Badminton => "BADMINTON",
            SportType::Tennis => "TENNIS",
            SportType::Basketball => "BASKETBALL",
            SportType::Volleyball => "VOLLEYBALL",
            SportType::Hockey => "HOCKEY",
            SportType::Futsal => "FUTSAL",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SportType::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sport type: {s}"))
    }
}

/// A bookable sports facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turf {
    #[serde(deserialize_with = "opaque_id::deserialize")]
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub sport_type: SportType,
    #[serde(rename = "pricePerSlot")]
    pub price_per_hour: f64,
    #[serde(rename = "operatingStartTime", with = "hh_mm")]
    pub operating_start: NaiveTime,
    #[serde(rename = "operatingEndTime", with = "hh_mm")]
    pub operating_end: NaiveTime,
    #[serde(
        rename = "ownerId",
        default,
        deserialize_with = "opaque_id::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Turf {
    /// Whether `range` falls inside the turf's operating hours.
    pub fn is_open_for(&self, range: &TimeRange) -> bool {
        range.within(self.operating_start, self.operating_end)
    }
}
