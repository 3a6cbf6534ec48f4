use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::models::{booking::Booking, turf::Turf, turf::SportType};

/// Booking list views offered to users and turf owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingFilter {
    #[default]
    All,
    /// Confirmed bookings that have not started yet.
    Upcoming,
    /// Bookings on today's date, whatever their status.
    Today,
    Cancelled,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        let today = now.date();
        match self {
            BookingFilter::All => true,
            BookingFilter::Upcoming => {
                booking.is_confirmed()
                    && (booking.date > today
                        || (booking.date == today && booking.start > now.time()))
            }
            BookingFilter::Today => booking.date == today,
            BookingFilter::Cancelled => booking.is_cancelled(),
        }
    }

    pub fn apply<'a>(&self, bookings: &'a [Booking], now: NaiveDateTime) -> Vec<&'a Booking> {
        bookings
            .iter()
            .filter(|booking| self.matches(booking, now))
            .collect()
    }
}

impl FromStr for BookingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BookingFilter::All),
            "upcoming" => Ok(BookingFilter::Upcoming),
            "today" => Ok(BookingFilter::Today),
            "cancelled" | "canceled" => Ok(BookingFilter::Cancelled),
            other => Err(format!("unknown booking filter: {other}")),
        }
    }
}

/// Criteria for browsing turfs. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurfFilter {
    /// Case-insensitive match against name or location
    pub search: Option<String>,
    pub sport_type: Option<SportType>,
    /// Case-insensitive match against location only
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl TurfFilter {
    pub fn matches(&self, turf: &Turf) -> bool {
        if let Some(search) = non_blank(&self.search) {
            if !contains_ignore_case(&turf.name, search)
                && !contains_ignore_case(&turf.location, search)
            {
                return false;
            }
        }

        if let Some(sport_type) = self.sport_type {
            if turf.sport_type != sport_type {
                return false;
            }
        }

        if let Some(location) = non_blank(&self.location) {
            if !contains_ignore_case(&turf.location, location) {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| turf.price_per_hour < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| turf.price_per_hour > max) {
            return false;
        }

        true
    }

    pub fn apply<'a>(&self, turfs: &'a [Turf]) -> Vec<&'a Turf> {
        turfs.iter().filter(|turf| self.matches(turf)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
