//! # Availability
//!
//! Decides whether a candidate [`TimeRange`] can be booked on a turf, given the
//! bookings and blocked intervals currently known for it.
//!
//! A candidate is unavailable when it overlaps (half-open, same date) either
//!
//! - a CONFIRMED booking of the same turf, or
//! - a blocked interval of the same turf.
//!
//! Cancelled bookings never block. Operating hours are not
//! checked here; callers validate them against the [`Turf`] before asking.
//!
//! The same data also yields the free windows of a day: the gaps inside the
//! operating hours that no booking or blocked interval covers. They are found
//! with a single sweep over the busy intervals sorted by start time.

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use crate::models::{
    blocked::BlockedInterval, booking::Booking, time_range::TimeRange, turf::Turf,
};

/// An existing entry that prevents a candidate from being booked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conflict<'a> {
    Booking(&'a Booking),
    Blocked(&'a BlockedInterval),
}

/// Availability view over one turf's bookings and blocked intervals.
///
/// Entries belonging to other turfs are ignored, so the slices can be passed
/// unfiltered.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityChecker<'a> {
    resource_id: &'a str,
    bookings: &'a [Booking],
    blocked: &'a [BlockedInterval],
}

impl<'a> AvailabilityChecker<'a> {
    pub fn new(
        resource_id: &'a str,
        bookings: &'a [Booking],
        blocked: &'a [BlockedInterval],
    ) -> Self {
        Self {
            resource_id,
            bookings,
            blocked,
        }
    }

    pub fn is_available(&self, candidate: &TimeRange) -> bool {
        let available = self.conflicts(candidate).is_empty();
        debug!(
            "Availability for turf {} at {}: {}",
            self.resource_id, candidate, available
        );
        available
    }

    /// Every confirmed booking and blocked interval overlapping `candidate`.
    pub fn conflicts(&self, candidate: &TimeRange) -> Vec<Conflict<'a>> {
        let bookings = self
            .active_bookings()
            .filter(|booking| booking.overlaps(candidate))
            .map(Conflict::Booking);
        let blocked = self
            .own_blocked()
            .filter(|interval| interval.overlaps(candidate))
            .map(Conflict::Blocked);

        bookings.chain(blocked).collect()
    }

    /// Maximal bookable sub-ranges of the turf's operating hours on `date`,
    /// in start order.
    ///
    /// A range cannot reach past the end of its day, so for a turf closing at
    /// `00:00` the last window ends at `23:59`.
    pub fn free_windows(&self, turf: &Turf, date: NaiveDate) -> Vec<TimeRange> {
        let open = turf.operating_start;
        let close = if turf.operating_end == NaiveTime::MIN {
            NaiveTime::MIN - Duration::minutes(1)
        } else {
            turf.operating_end
        };
        if open >= close {
            return Vec::new();
        }

        // Busy spans clipped to the operating hours
        let mut busy: Vec<(NaiveTime, NaiveTime)> = self
            .active_bookings()
            .filter(|booking| booking.date == date)
            .map(|booking| (booking.start, booking.end))
            .chain(
                self.own_blocked()
                    .filter(|interval| interval.date == date)
                    .map(|interval| (interval.start, interval.end)),
            )
            .map(|(start, end)| (start.max(open), end.min(close)))
            .filter(|(start, end)| start < end)
            .collect();
        busy.sort();

        let mut windows = Vec::new();
        let mut cursor = open;
        for (start, end) in busy {
            if start > cursor {
                if let Ok(window) = TimeRange::new(date, cursor, start) {
                    windows.push(window);
                }
            }
            cursor = cursor.max(end);
        }
        if cursor < close {
            if let Ok(window) = TimeRange::new(date, cursor, close) {
                windows.push(window);
            }
        }

        windows
    }

    fn active_bookings(&self) -> impl Iterator<Item = &'a Booking> + 'a {
        let resource_id = self.resource_id;
        self.bookings
            .iter()
            .filter(move |booking| booking.resource_id == resource_id && booking.is_confirmed())
    }

    fn own_blocked(&self) -> impl Iterator<Item = &'a BlockedInterval> + 'a {
        let resource_id = self.resource_id;
        self.blocked
            .iter()
            .filter(move |interval| interval.resource_id == resource_id)
    }
}

/// Shorthand for [`AvailabilityChecker::is_available`].
pub fn is_available(
    resource_id: &str,
    candidate: &TimeRange,
    bookings: &[Booking],
    blocked: &[BlockedInterval],
) -> bool {
    AvailabilityChecker::new(resource_id, bookings, blocked).is_available(candidate)
}
