use async_trait::async_trait;
use kickoff_core::{BlockedInterval, Booking, NewBlockedInterval, NewBooking, TimeRange, Turf};
use mockall::mock;

use crate::backend::{BackendError, BookingBackend};

// Mock backend for testing
mock! {
    pub Backend {}

    #[async_trait]
    impl BookingBackend for Backend {
        async fn check_availability(
            &self,
            resource_id: &str,
            range: &TimeRange,
        ) -> Result<bool, BackendError>;

        async fn quote_price(
            &self,
            resource_id: &str,
            range: &TimeRange,
        ) -> Result<f64, BackendError>;

        async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError>;

        async fn get_booking(&self, booking_id: &str) -> Result<Booking, BackendError>;

        async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BackendError>;

        async fn bookings_by_resource(
            &self,
            resource_id: &str,
        ) -> Result<Vec<Booking>, BackendError>;

        async fn bookings_by_requester(
            &self,
            requester_id: &str,
        ) -> Result<Vec<Booking>, BackendError>;

        async fn blocked_intervals(
            &self,
            resource_id: &str,
        ) -> Result<Vec<BlockedInterval>, BackendError>;

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
}
