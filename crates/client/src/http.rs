//! HTTP+JSON implementation of [`BookingBackend`].

use async_trait::async_trait;
use eyre::Result;
use kickoff_core::{BlockedInterval, Booking, NewBlockedInterval, NewBooking, TimeRange, Turf};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::backend::{BackendError, BookingBackend};
use crate::config::ClientConfig;

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    total_price: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Talks to the booking backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turns non-success responses into the matching [`BackendError`].
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    Err(match status {
        StatusCode::CONFLICT => BackendError::Conflict(message),
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        _ => BackendError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn check_availability(
        &self,
        resource_id: &str,
        range: &TimeRange,
    ) -> Result<bool, BackendError> {
        let date = range.date().format("%Y-%m-%d").to_string();
        let start = range.start().format("%H:%M").to_string();
        let end = range.end().format("%H:%M").to_string();

        let request = self
            .request(Method::GET, "/bookings/check-availability")
            .query(&[
                ("turfId", resource_id),
                ("date", date.as_str()),
                ("startTime", start.as_str()),
                ("endTime", end.as_str()),
            ]);
        let response: AvailabilityResponse = self.fetch(request).await?;

        Ok(response.available)
    }

    async fn quote_price(&self, resource_id: &str, range: &TimeRange) -> Result<f64, BackendError> {
        let start = range.start().format("%H:%M").to_string();
        let end = range.end().format("%H:%M").to_string();

        let request = self
            .request(Method::GET, "/bookings/calculate-price")
            .query(&[
                ("turfId", resource_id),
                ("startTime", start.as_str()),
                ("endTime", end.as_str()),
            ]);
        let response: PriceResponse = self.fetch(request).await?;

        Ok(response.total_price)
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError> {
        let request = self.request(Method::POST, "/bookings").json(booking);
        self.fetch(request).await
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Booking, BackendError> {
        let request = self.request(Method::GET, &format!("/bookings/{booking_id}"));
        self.fetch(request).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BackendError> {
        let request = self.request(Method::PUT, &format!("/bookings/{booking_id}/cancel"));
        self.fetch(request).await
    }

    async fn bookings_by_resource(&self, resource_id: &str) -> Result<Vec<Booking>, BackendError> {
        let request = self.request(Method::GET, &format!("/bookings/turf/{resource_id}"));
        self.fetch(request).await
    }

    async fn bookings_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<Booking>, BackendError> {
        let request = self.request(Method::GET, &format!("/bookings/user/{requester_id}"));
        self.fetch(request).await
    }

    async fn blocked_intervals(
        &self,
        resource_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError> {
        let request = self.request(Method::GET, &format!("/blocked-slots/turf/{resource_id}"));
        self.fetch(request).await
    }

    async fn blocked_intervals_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<BlockedInterval>, BackendError> {
        let request = self.request(Method::GET, &format!("/blocked-slots/owner/{owner_id}"));
        self.fetch(request).await
    }

    async fn create_blocked_interval(
        &self,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError> {
        let request = self.request(Method::POST, "/blocked-slots").json(interval);
        self.fetch(request).await
    }

    async fn update_blocked_interval(
        &self,
        interval_id: &str,
        interval: &NewBlockedInterval,
    ) -> Result<BlockedInterval, BackendError> {
        let request = self
            .request(Method::PUT, &format!("/blocked-slots/{interval_id}"))
            .json(interval);
        self.fetch(request).await
    }

    async fn delete_blocked_interval(&self, interval_id: &str) -> Result<(), BackendError> {
        let request = self.request(Method::DELETE, &format!("/blocked-slots/{interval_id}"));
        check_status(request.send().await?).await?;
        Ok(())
    }

    async fn list_turfs(&self) -> Result<Vec<Turf>, BackendError> {
        let request = self.request(Method::GET, "/turfs");
        self.fetch(request).await
    }

    async fn get_turf(&self, turf_id: &str) -> Result<Turf, BackendError> {
        let request = self.request(Method::GET, &format!("/turfs/{turf_id}"));
        self.fetch(request).await
    }
}
