use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use kickoff_core::{
    AvailabilityChecker, BlockedInterval, Booking, BookingStatus, NewBlockedInterval, NewBooking,
    TimeRange, Turf, compute_price,
};
use tokio::sync::{Barrier, Mutex};
use uuid::Uuid;

use crate::backend::{BackendError, BookingBackend};

#[derive(Debug, Default)]
struct Store {
    turfs: Vec<Turf>,
    bookings: Vec<Booking>,
    blocked: Vec<BlockedInterval>,
}

/// In-process backend that serializes writes under a lock and rejects
/// overlapping bookings with a conflict, the way the real backend does.
///
/// Latency, a create barrier and price failures can be injected to exercise
/// races and timeouts.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
    latency: Option<Duration>,
    create_barrier: Option<Arc<Barrier>>,
    price_unavailable: bool,
    create_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turf(mut self, turf: Turf) -> Self {
        self.store.get_mut().turfs.push(turf);
        self
    }

    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.store.get_mut().bookings.push(booking);
        self
    }

    pub fn with_blocked(mut self, interval: BlockedInterval) -> Self {
        self.store.get_mut().blocked.push(interval);
        self
    }

    /// Delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Holds create calls until `parties` of them are waiting, so concurrent
    /// attempts all pass their availability check first.
    pub fn with_create_barrier(mut self, parties: usize) -> Self {
        self.create_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn with_price_unavailable(mut self) -> Self {
        self.price_unavailable = true;
        self
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.store.lock().await.bookings.clone()
    }

    pub async fn blocked(&self) -> Vec<BlockedInterval> {
        self.store.lock().await.blocked.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl BookingBackend for InMemoryBackend {
    async fn check_availability(
        &self,
        resource_id: &str,
        range: &TimeRange,
    ) -> Result<bool, BackendError> {
        self.delay().await;
        let store = self.store.lock().await;
        Ok(AvailabilityChecker::new(resource_id, &store.bookings, &store.blocked).is_available(range))
    }

    async fn quote_price(&self, resource_id: &str, range: &TimeRange) -> Result<f64, BackendError> {
        self.delay().await;
        if self.price_unavailable {
            return Err(BackendError::Status {
                status: 503,
                message: "pricing unavailable".to_string(),
            });
        }

        let store = self.store.lock().await;
        let turf = store
            .turfs
            .iter()
            .find(|turf| turf.id == resource_id)
            .ok_or_else(|| BackendError::NotFound(format!("turf {resource_id}")))?;
        compute_price(turf.price_per_hour, range).map_err(|err| BackendError::Status {
            status: 400,
            message: err.to_string(),
        })
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.create_barrier {
            barrier.wait().await;
        }
        self.delay().await;

        let mut store = self.store.lock().await;
        let range = TimeRange::new(booking.date, booking.start, booking.end).map_err(|err| {
            BackendError::Status {
                status: 400,
                message: err.to_string(),
            }
        })?;

        let checker =
            AvailabilityChecker::new(&booking.resource_id, &store.bookings, &store.blocked);
        if !checker.is_available(&range) {
            return Err(BackendError::Conflict(format!(
                "{} is already booked",
                range
            )));
        }

        let total_price = store
            .turfs
            .iter()
            .find(|turf| turf.id == booking.resource_id)
            .and_then(|turf| compute_price(turf.price_per_hour, &range).ok())
            .unwrap_or_default();

        let created = Booking {
            id: Uuid::new_v4().to_string(),
            resource_id: booking.resource_id.clone(),
            requester_id: booking.requester_id.clone(),
            date: booking.date,
            start: booking.start,
            end: booking.end,
            status: BookingStatus::Confirmed,
            total_price,
        };
        store.bookings.push(created.clone());
        Ok(created)
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Booking, BackendError> {
        self.delay().await;
        self.store
            .lock()
            .await
            .bookings
            .iter()
            .find(|booking| booking.id == booking_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("booking {booking_id}")))
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BackendError> {
        self.delay().await;
        let mut store = self.store.lock().await;
        let booking = store
            .bookings
            .iter_mut()
            .find(|booking| booking.id == booking_id)
            .ok_or_else(|| BackendError::NotFound(format!("booking {booking_id}")))?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn bookings_by_resource(&self, resource_id: &str) -> Result<Vec<Booking>, BackendError> {
        self.delay().await;
        let store = self.store.lock().await;
        Ok(store
            .bookings
            .iter()
            .filter(|booking| booking.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn bookings_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<Booking>, BackendError> {
        self.delay().await;
        let store = self.store.lock().await;
        Ok(store
            .bookings
            .iter()
            .filter(|booking| booking.requester_id == requester_id)
            .cloned()
            .collect())
    }

    async fn blocked_intervals(
        &self,
        resource_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError> {
        self.delay().await;
        let store = self.store.lock().await;
        Ok(store
            .blocked
            .iter()
            .filter(|interval| interval.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn blocked_intervals_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError> {
        self.delay().await;
        let store = self.store.lock().await;
        let owned: Vec<&Turf> = store
            .turfs
            .iter()
            .filter(|turf| turf.owner_id.as_deref() == Some(owner_id))
            .collect();

        Ok(store
            .blocked
            .iter()
            .filter_map(|interval| {
                let turf = owned.iter().find(|turf| turf.id == interval.resource_id)?;
                Some(BlockedInterval {
                    turf_name: Some(turf.name.clone()),
                    ..interval.clone()
                })
            })
            .collect())
    }

    async fn create_blocked_interval(
        &self,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError> {
        self.delay().await;
        let mut store = self.store.lock().await;
        let turf_name = store
            .turfs
            .iter()
            .find(|turf| turf.id == interval.resource_id)
            .map(|turf| turf.name.clone());
        let created = BlockedInterval {
            id: Uuid::new_v4().to_string(),
            resource_id: interval.resource_id.clone(),
            date: interval.date,
            start: interval.start,
            end: interval.end,
            turf_name,
        };
        store.blocked.push(created.clone());
        Ok(created)
    }

    async fn update_blocked_interval(
        &self,
        interval_id: &str,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError> {
        self.delay().await;
        let mut store = self.store.lock().await;
        let existing = store
            .blocked
            .iter_mut()
            .find(|blocked| blocked.id == interval_id)
            .ok_or_else(|| BackendError::NotFound(format!("blocked slot {interval_id}")))?;
        existing.resource_id = interval.resource_id.clone();
        existing.date = interval.date;
        existing.start = interval.start;
        existing.end = interval.end;
        Ok(existing.clone())
    }

    async fn delete_blocked_interval(&self, interval_id: &str) -> Result<(), BackendError> {
        self.delay().await;
        let mut store = self.store.lock().await;
        let before = store.blocked.len();
        store.blocked.retain(|blocked| blocked.id != interval_id);
        if store.blocked.len() == before {
            return Err(BackendError::NotFound(format!("blocked slot {interval_id}")));
        }
        Ok(())
    }

    async fn list_turfs(&self) -> Result<Vec<Turf>, BackendError> {
        self.delay().await;
        Ok(self.store.lock().await.turfs.clone())
    }

    async fn get_turf(&self, turf_id: &str) -> Result<Turf, BackendError> {
        self.delay().await;
        self.store
            .lock()
            .await
            .turfs
            .iter()
            .find(|turf| turf.id == turf_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("turf {turf_id}")))
    }
}
