//! # Booking Submission Coordinator
//!
//! Drives one booking attempt through
//! `Idle → Validating → CheckingAvailability → Submitting → Succeeded | Failed`.
//!
//! The availability check is advisory: another client can confirm the same
//! slot between the check and the create call, in which case the backend
//! answers with a conflict and the attempt fails with
//! `BookingError::BookingConflict`. Nothing is retried automatically; the
//! caller starts a new attempt with fresh data.
//!
//! Only one attempt runs per coordinator. The id of the running attempt is
//! kept in `active` and every state change checks it under the watch
//! channel's lock, so an abandoned attempt can finish its network calls
//! without its results ever reaching the observable state.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use eyre::eyre;
use kickoff_core::{
    Booking, BookingError, BookingResult, FailureKind, NewBooking, TimeRange, Turf, compute_price,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::{BookingBackend, with_timeout};

/// Observable state of a coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    CheckingAvailability,
    Submitting,
    Succeeded(Booking),
    Failed(FailureKind),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Succeeded(_) | SubmissionState::Failed(_))
    }
}

/// What the user entered in the booking form, for one turf.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub turf: Turf,
    pub requester_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
}

impl SubmitRequest {
    pub fn for_range(turf: Turf, requester_id: &str, range: &TimeRange) -> Self {
        Self {
            turf,
            requester_id: requester_id.to_string(),
            date: range.date().format("%Y-%m-%d").to_string(),
            start_time: range.start().format("%H:%M").to_string(),
            end_time: range.end().format("%H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    Backend,
    /// Computed from the turf's hourly rate after the backend lookup failed
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub amount: f64,
    pub source: QuoteSource,
}

pub struct BookingCoordinator<B> {
    backend: Arc<B>,
    timeout: Duration,
    // 0 when no attempt is running
    active: AtomicU64,
    next_attempt: AtomicU64,
    state: watch::Sender<SubmissionState>,
}

impl<B: BookingBackend> BookingCoordinator<B> {
    pub fn new(backend: Arc<B>, timeout: Duration) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            backend,
            timeout,
            active: AtomicU64::new(0),
            next_attempt: AtomicU64::new(0),
            state,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receives every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        self.active.load(Ordering::SeqCst) != 0
    }

    /// Runs one booking attempt to completion.
    ///
    /// # Errors
    ///
    /// * `BookingError::AlreadyInProgress` - another attempt is still running
    /// * `BookingError::Validation` - missing or malformed fields, or a slot
    ///   outside the turf's operating hours
    /// * `BookingError::SlotUnavailable` - the advisory check said no
    /// * `BookingError::BookingConflict` - the backend rejected the create call
    ///   because the slot was taken
    /// * `BookingError::Timeout` - a backend call exceeded the timeout
    /// * `BookingError::Submission` - any other backend failure
    /// * `BookingError::Abandoned` - [`BookingCoordinator::abandon`] was called
    pub async fn submit(&self, request: SubmitRequest) -> BookingResult<Booking> {
        let attempt = self.begin()?;
        let _guard = AttemptGuard {
            active: &self.active,
            state: &self.state,
            attempt,
        };

        let result = self.run(attempt, &request).await;
        self.finish(attempt, result)
    }

    /// Abandons the running attempt, if any, and returns to `Idle`.
    ///
    /// Calls already sent to the backend are left to complete; their results
    /// are discarded.
    pub fn abandon(&self) -> bool {
        let mut abandoned = false;
        self.state.send_if_modified(|state| {
            let attempt = self.active.swap(0, Ordering::SeqCst);
            if attempt == 0 {
                return false;
            }
            info!("Abandoned booking attempt {}", attempt);
            abandoned = true;
            *state = SubmissionState::Idle;
            true
        });
        abandoned
    }

    /// Clears a finished attempt's outcome.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if self.active.load(Ordering::SeqCst) != 0 || *state == SubmissionState::Idle {
                return false;
            }
            *state = SubmissionState::Idle;
            true
        });
    }

    /// Price to display for `range`. Falls back to the turf's hourly rate when
    /// the backend cannot answer; never touches the submission state.
    pub async fn quote(&self, turf: &Turf, range: &TimeRange) -> BookingResult<PriceQuote> {
        match with_timeout(self.timeout, self.backend.quote_price(&turf.id, range)).await {
            Ok(amount) => Ok(PriceQuote {
                amount,
                source: QuoteSource::Backend,
            }),
            Err(err) => {
                warn!(
                    "Price lookup failed for turf {}, using local rate: {}",
                    turf.id, err
                );
                Ok(PriceQuote {
                    amount: compute_price(turf.price_per_hour, range)?,
                    source: QuoteSource::Local,
                })
            }
        }
    }

    fn begin(&self) -> BookingResult<u64> {
        let attempt = self.next_attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.active
            .compare_exchange(0, attempt, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|running| {
                warn!(
                    "Rejected booking attempt {} while attempt {} is running",
                    attempt, running
                );
                BookingError::AlreadyInProgress
            })?;
        debug!("Started booking attempt {}", attempt);
        Ok(attempt)
    }

    async fn run(&self, attempt: u64, request: &SubmitRequest) -> BookingResult<Booking> {
        self.transition(attempt, SubmissionState::Validating)?;
        let range = validate(request)?;

        self.transition(attempt, SubmissionState::CheckingAvailability)?;
        let available = with_timeout(
            self.timeout,
            self.backend.check_availability(&request.turf.id, &range),
        )
        .await
        .map_err(as_submission_failure)?;
        if !available {
            return Err(BookingError::SlotUnavailable(format!(
                "{} is already taken on turf {}",
                range, request.turf.id
            )));
        }

        // The check may have outlived an abandon; never create in that case
        self.transition(attempt, SubmissionState::Submitting)?;
        let booking = NewBooking::new(&request.turf.id, &request.requester_id, &range);
        with_timeout(self.timeout, self.backend.create_booking(&booking))
            .await
            .map_err(as_submission_failure)
    }

    /// Publishes `next` if `attempt` is still the running one.
    fn transition(&self, attempt: u64, next: SubmissionState) -> BookingResult<()> {
        let published = self.state.send_if_modified(|state| {
            if self.active.load(Ordering::SeqCst) != attempt {
                return false;
            }
            debug!("Booking attempt {}: {:?} -> {:?}", attempt, state, next);
            *state = next;
            true
        });

        if published {
            Ok(())
        } else {
            Err(BookingError::Abandoned)
        }
    }

    /// Publishes the outcome and releases the attempt in one step.
    fn finish(&self, attempt: u64, result: BookingResult<Booking>) -> BookingResult<Booking> {
        let outcome = match &result {
            Ok(booking) => SubmissionState::Succeeded(booking.clone()),
            Err(err) => SubmissionState::Failed(err.kind()),
        };

        let published = self.state.send_if_modified(|state| {
            if self
                .active
                .compare_exchange(attempt, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return false;
            }
            *state = outcome;
            true
        });

        if !published {
            debug!("Discarded result of abandoned booking attempt {}", attempt);
            return Err(BookingError::Abandoned);
        }

        match &result {
            Ok(booking) => info!(
                "Booking {} confirmed for turf {} on {} {}-{}",
                booking.id,
                booking.resource_id,
                booking.date,
                booking.start.format("%H:%M"),
                booking.end.format("%H:%M")
            ),
            Err(err) => warn!("Booking attempt {} failed: {}", attempt, err),
        }
        result
    }
}

/// Releases the attempt if the `submit` future is dropped before finishing.
struct AttemptGuard<'a> {
    active: &'a AtomicU64,
    state: &'a watch::Sender<SubmissionState>,
    attempt: u64,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if self
                .active
                .compare_exchange(self.attempt, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return false;
            }
            *state = SubmissionState::Idle;
            true
        });
    }
}

/// A submission fails only as a conflict, a timeout or a submission error.
fn as_submission_failure(err: BookingError) -> BookingError {
    match err {
        BookingError::NotFound(message) => {
            BookingError::Submission(eyre!("Backend rejected the booking: {message}"))
        }
        other => other,
    }
}

fn validate(request: &SubmitRequest) -> BookingResult<TimeRange> {
    if request.turf.id.trim().is_empty() {
        return Err(BookingError::Validation("turf id is required".to_string()));
    }
    if request.requester_id.trim().is_empty() {
        return Err(BookingError::Validation("requester id is required".to_string()));
    }

    let range = TimeRange::parse(&request.date, &request.start_time, &request.end_time)
        .map_err(|err| match err {
            BookingError::InvalidRange(message) => BookingError::Validation(message),
            other => other,
        })?;

    let turf = &request.turf;
    if !turf.is_open_for(&range) {
        return Err(BookingError::Validation(format!(
            "{} is outside operating hours {}-{}",
            range,
            turf.operating_start.format("%H:%M"),
            turf.operating_end.format("%H:%M")
        )));
    }

    Ok(range)
}
