//! # Kickoff Core
//!
//! Pure domain logic for turf bookings: time ranges, pricing, availability
//! checks and listing filters. Nothing in this crate performs I/O; the
//! client crate feeds it data fetched from the booking backend.

pub mod availability;
pub mod errors;
pub mod filters;
pub mod models;
pub mod pricing;

pub use availability::{AvailabilityChecker, Conflict, is_available};
pub use errors::{BookingError, BookingResult, FailureKind};
pub use filters::{BookingFilter, TurfFilter};
pub use models::{
    blocked::{BlockedInterval, NewBlockedInterval},
    booking::{Booking, BookingStatus, NewBooking},
    time_range::TimeRange,
    turf::{SportType, Turf},
};
pub use pricing::compute_price;
