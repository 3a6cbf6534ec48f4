//! # Booking Service
//!
//! Everyday operations around the coordinator: browsing turfs, listing and
//! cancelling bookings, and owner management of blocked slots. Every backend
//! call runs under the configured timeout.
//!
//! Destructive operations take an explicit [`Confirmation`]. A declined
//! confirmation returns early without contacting the backend.

use std::{sync::Arc, time::Duration};

use chrono::{NaiveDate, NaiveDateTime};
use kickoff_core::{
    AvailabilityChecker, BlockedInterval, Booking, BookingError, BookingFilter, BookingResult,
    NewBlockedInterval, TimeRange, Turf, TurfFilter,
};
use tracing::info;

use crate::backend::{BookingBackend, with_timeout};
use crate::coordinator::BookingCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub struct BookingService<B> {
    backend: Arc<B>,
    timeout: Duration,
}

impl<B: BookingBackend> BookingService<B> {
    pub fn new(backend: Arc<B>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// A fresh coordinator sharing this service's backend and timeout.
    pub fn coordinator(&self) -> BookingCoordinator<B> {
        BookingCoordinator::new(Arc::clone(&self.backend), self.timeout)
    }

    pub async fn turfs(&self, filter: &TurfFilter) -> BookingResult<Vec<Turf>> {
        let turfs = with_timeout(self.timeout, self.backend.list_turfs()).await?;
        Ok(filter.apply(&turfs).into_iter().cloned().collect())
    }

    pub async fn turf(&self, turf_id: &str) -> BookingResult<Turf> {
        with_timeout(self.timeout, self.backend.get_turf(turf_id)).await
    }

    /// Bookable windows of a turf on `date`, from the bookings and blocked
    /// slots the backend reports right now.
    pub async fn free_windows(&self, turf_id: &str, date: NaiveDate) -> BookingResult<Vec<TimeRange>> {
        let turf = self.turf(turf_id).await?;
        let bookings = with_timeout(self.timeout, self.backend.bookings_by_resource(turf_id)).await?;
        let blocked = with_timeout(self.timeout, self.backend.blocked_intervals(turf_id)).await?;

        Ok(AvailabilityChecker::new(&turf.id, &bookings, &blocked).free_windows(&turf, date))
    }

    pub async fn bookings_for_requester(
        &self,
        requester_id: &str,
        filter: BookingFilter,
        now: NaiveDateTime,
    ) -> BookingResult<Vec<Booking>> {
        let bookings =
            with_timeout(self.timeout, self.backend.bookings_by_requester(requester_id)).await?;
        Ok(filter.apply(&bookings, now).into_iter().cloned().collect())
    }

    pub async fn bookings_for_turf(
        &self,
        turf_id: &str,
        filter: BookingFilter,
        now: NaiveDateTime,
    ) -> BookingResult<Vec<Booking>> {
        let bookings = with_timeout(self.timeout, self.backend.bookings_by_resource(turf_id)).await?;
        Ok(filter.apply(&bookings, now).into_iter().cloned().collect())
    }

    /// Cancels a confirmed booking that has not started yet at `now`.
    ///
    /// Returns `Ok(None)` when the confirmation was declined. Cancellation is
    /// terminal: an already cancelled booking is rejected with
    /// `BookingError::Validation`, and so is one that already started.
    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        confirmation: Confirmation,
        now: NaiveDateTime,
    ) -> BookingResult<Option<Booking>> {
        if confirmation == Confirmation::Declined {
            return Ok(None);
        }

        let booking = with_timeout(self.timeout, self.backend.get_booking(booking_id)).await?;
        if booking.is_cancelled() {
            return Err(BookingError::Validation(format!(
                "booking {booking_id} is already cancelled"
            )));
        }
        if !BookingFilter::Upcoming.matches(&booking, now) {
            return Err(BookingError::Validation(format!(
                "booking {booking_id} has already started"
            )));
        }

        let cancelled = with_timeout(self.timeout, self.backend.cancel_booking(booking_id)).await?;
        info!("Cancelled booking {}", cancelled.id);
        Ok(Some(cancelled))
    }

    pub async fn blocked_intervals(&self, turf_id: &str) -> BookingResult<Vec<BlockedInterval>> {
        with_timeout(self.timeout, self.backend.blocked_intervals(turf_id)).await
    }

    /// Blocked slots of every turf the owner manages, sorted by date and start.
    pub async fn blocked_intervals_for_owner(
        &self,
        owner_id: &str,
    ) -> BookingResult<Vec<BlockedInterval>> {
        if owner_id.trim().is_empty() {
            return Err(BookingError::Validation("owner id is required".to_string()));
        }

        let mut blocked =
            with_timeout(self.timeout, self.backend.blocked_intervals_by_owner(owner_id)).await?;
        blocked.sort_by_key(|interval| (interval.date, interval.start));
        Ok(blocked)
    }

    /// Blocks a window on a turf, from form fields.
    pub async fn block_interval(
        &self,
        turf_id: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
    ) -> BookingResult<BlockedInterval> {
        let interval = blocked_interval_form(turf_id, date, start_time, end_time)?;
        let created =
            with_timeout(self.timeout, self.backend.create_blocked_interval(&interval)).await?;
        info!(
            "Blocked turf {} on {} {}-{}",
            created.resource_id,
            created.date,
            created.start.format("%H:%M"),
            created.end.format("%H:%M")
        );
        Ok(created)
    }

    pub async fn update_blocked_interval(
        &self,
        interval_id: &str,
        turf_id: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
    ) -> BookingResult<BlockedInterval> {
        let interval = blocked_interval_form(turf_id, date, start_time, end_time)?;
        with_timeout(
            self.timeout,
            self.backend.update_blocked_interval(interval_id, &interval),
        )
        .await
    }

    /// Removes a blocked slot. Returns `false` when the confirmation was declined.
    pub async fn unblock_interval(
        &self,
        interval_id: &str,
        confirmation: Confirmation,
    ) -> BookingResult<bool> {
        if confirmation == Confirmation::Declined {
            return Ok(false);
        }

        with_timeout(self.timeout, self.backend.delete_blocked_interval(interval_id)).await?;
        info!("Unblocked slot {}", interval_id);
        Ok(true)
    }
}

fn blocked_interval_form(
    turf_id: &str,
    date: &str,
    start_time: &str,
    end_time: &str,
) -> BookingResult<NewBlockedInterval> {
    if turf_id.trim().is_empty() {
        return Err(BookingError::Validation("turf id is required".to_string()));
    }
    let range = TimeRange::parse(date, start_time, end_time)?;

    Ok(NewBlockedInterval::new(turf_id.trim(), &range))
}
