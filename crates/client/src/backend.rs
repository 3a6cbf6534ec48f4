//! # Backend Collaborator
//!
//! The booking backend owns turfs, bookings and blocked slots, and is the
//! final arbiter of overlapping bookings. This module defines the contract the
//! rest of the client talks to, so the coordinator and the service layer can
//! run against the HTTP implementation or an in-process double alike.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use kickoff_core::{
    BlockedInterval, Booking, BookingError, BookingResult, NewBlockedInterval, NewBooking,
    TimeRange, Turf,
};
use thiserror::Error;

/// Failures reported by a [`BookingBackend`].
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend refused a write because it overlaps existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request exceeded the client's own timeout. Gateway timeout
    /// statuses are reported as [`BackendError::Status`].
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Maps a backend failure into the booking error taxonomy.
    pub fn into_booking_error(self, timeout: Duration) -> BookingError {
        match self {
            BackendError::Conflict(message) => BookingError::BookingConflict(message),
            BackendError::NotFound(message) => BookingError::NotFound(message),
            BackendError::Timeout => BookingError::Timeout(timeout.as_millis() as u64),
            other => BookingError::Submission(eyre::Report::new(other)),
        }
    }
}

/// Request/response contract of the booking backend.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Advisory availability check. Grants no reservation.
    async fn check_availability(
        &self,
        resource_id: &str,
        range: &TimeRange,
    ) -> Result<bool, BackendError>;

    async fn quote_price(&self, resource_id: &str, range: &TimeRange) -> Result<f64, BackendError>;

    /// Creates a confirmed booking, or fails with [`BackendError::Conflict`]
    /// when the slot was taken in the meantime.
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError>;

    async fn get_booking(&self, booking_id: &str) -> Result<Booking, BackendError>;

    async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BackendError>;

    async fn bookings_by_resource(&self, resource_id: &str) -> Result<Vec<Booking>, BackendError>;

    async fn bookings_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<Booking>, BackendError>;

    async fn blocked_intervals(
        &self,
        resource_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError>;

    /// Blocked slots across every turf of an owner, with turf names filled in.
    async fn blocked_intervals_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError>;

    async fn create_blocked_interval(
        &self,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError>;

    async fn update_blocked_interval(
        &self,
        interval_id: &str,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError>;

    async fn delete_blocked_interval(&self, interval_id: &str) -> Result<(), BackendError>;

    async fn list_turfs(&self) -> Result<Vec<Turf>, BackendError>;

    async fn get_turf(&self, turf_id: &str) -> Result<Turf, BackendError>;
}

/// Runs a backend call under `timeout`, mapping every failure into a
/// [`BookingError`]. Expiry yields `BookingError::Timeout`.
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> BookingResult<T>
where
    F: Future<Output = Result<T, BackendError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.into_booking_error(timeout)),
        Err(_) => Err(BookingError::Timeout(timeout.as_millis() as u64)),
    }
}
