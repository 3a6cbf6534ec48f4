
use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use kickoff_client::{BackendError, BookingBackend, ClientConfig, HttpBackend};
use kickoff_core::{BookingStatus, NewBlockedInterval, NewBooking, SportType, TimeRange};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use test_utils::{DATE, TURF, USER, time};

const TOKEN: &str = "secret-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer secret-token")
}

async fn check_availability(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })));
    }
    let free = params.get("turfId").map(String::as_str) == Some(TURF)
        && params.get("date").map(String::as_str) == Some(DATE)
        && params.get("startTime").map(String::as_str) == Some("10:00")
        && params.get("endTime").map(String::as_str) == Some("11:00");
    (StatusCode::OK, Json(json!({ "available": free })))
}

async fn calculate_price(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let amount = match params.get("startTime").map(String::as_str) {
        Some("09:00") => 750.0,
        _ => 0.0,
    };
    Json(json!({ "totalPrice": amount }))
}

async fn create_booking(Json(body): Json<Value>) -> impl IntoResponse {
    if body["slotStartTime"] == "09:00" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Slot already booked" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 42,
            "turfId": body["turfId"],
            "userId": body["userId"],
            "bookingDate": body["bookingDate"],
            "slotStartTime": body["slotStartTime"],
            "slotEndTime": body["slotEndTime"],
            "status": "CONFIRMED",
            "totalPrice": 500.0
        })),
    )
}

async fn get_booking(Path(id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Booking {id} not found") })),
    )
}

async fn cancel_booking() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database down")
}

async fn list_turfs() -> Json<Value> {
    Json(json!([{
        "id": 1,
        "name": "Green Arena",
        "location": "Indiranagar",
        "type": "FOOTBALL",
        "pricePerSlot": 500.0,
        "operatingStartTime": "06:00:00",
        "operatingEndTime": "22:00:00",
        "ownerId": 7
    }]))
}

async fn slow_turf() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({}))
}

async fn create_blocked(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": "x1",
        "turfId": body["turfId"],
        "blockedDate": body["blockedDate"],
        "startTime": body["startTime"],
        "endTime": body["endTime"],
        "turfName": "Green Arena"
    }))
}

async fn owner_blocked(Path(owner): Path<String>) -> Json<Value> {
    if owner != "7" {
        return Json(json!([]));
    }
    Json(json!([
        {
            "id": 11,
            "turfId": 1,
            "blockedDate": DATE,
            "startTime": "18:00:00",
            "endTime": "20:00:00",
            "turfName": "Green Arena"
        },
        {
            "id": 12,
            "turfId": 2,
            "blockedDate": DATE,
            "startTime": "07:00:00",
            "endTime": "08:00:00",
            "turfName": "Baseline Club"
        }
    ]))
}

async fn gateway_timeout() -> impl IntoResponse {
    (StatusCode::GATEWAY_TIMEOUT, "upstream timed out")
}

async fn delete_blocked() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn spawn_stub() -> SocketAddr {
    let api = Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/check-availability", get(check_availability))
        .route("/bookings/calculate-price", get(calculate_price))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/cancel", put(cancel_booking))
        .route("/turfs", get(list_turfs))
        .route("/turfs/:id", get(slow_turf))
        .route("/blocked-slots", post(create_blocked))
        .route("/blocked-slots/:id", delete(delete_blocked))
        .route("/blocked-slots/owner/:owner", get(owner_blocked))
        .route("/bookings/user/:id", get(gateway_timeout));
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn backend(timeout_ms: u64) -> HttpBackend {
    let addr = spawn_stub().await;
    let vars = HashMap::from([
        ("KICKOFF_API_URL", format!("http://{addr}/api/")),
        ("KICKOFF_API_TOKEN", TOKEN.to_string()),
        ("KICKOFF_REQUEST_TIMEOUT_MS", timeout_ms.to_string()),
    ]);
    let config = ClientConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    HttpBackend::new(&config).unwrap()
}

fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::parse(DATE, start, end).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_check_availability_sends_query_and_token() {
    let backend = backend(2_000).await;

    let free = backend
        .check_availability(TURF, &range("10:00", "11:00"))
        .await
        .unwrap();
    let taken = backend
        .check_availability(TURF, &range("09:00", "10:00"))
        .await
        .unwrap();

    assert!(free);
    assert!(!taken);
}

#[tokio::test]
async fn test_quote_price() {
    let backend = backend(2_000).await;

    let amount = backend
        .quote_price(TURF, &range("09:00", "10:30"))
        .await
        .unwrap();

    assert_eq!(amount, 750.0);
}

#[tokio::test]
async fn test_create_booking() {
    let backend = backend(2_000).await;
    let request = NewBooking::new(TURF, USER, &range("10:00", "11:00"));

    let created = backend.create_booking(&request).await.unwrap();

    assert_eq!(created.id, "42");
    assert_eq!(created.resource_id, TURF);
    assert_eq!(created.start, time("10:00"));
    assert_eq!(created.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_create_booking_conflict() {
    let backend = backend(2_000).await;
    let request = NewBooking::new(TURF, USER, &range("09:00", "10:00"));

    let err = backend.create_booking(&request).await.unwrap_err();

    assert!(matches!(err, BackendError::Conflict(ref message) if message == "Slot already booked"));
}

#[tokio::test]
async fn test_missing_booking_uses_message_field() {
    let backend = backend(2_000).await;

    let err = backend.get_booking("99").await.unwrap_err();

    assert!(matches!(err, BackendError::NotFound(ref message) if message == "Booking 99 not found"));
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let backend = backend(2_000).await;

    let err = backend.cancel_booking("1").await.unwrap_err();

    match err {
        BackendError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_turfs_accepts_numeric_ids() {
    let backend = backend(2_000).await;

    let turfs = backend.list_turfs().await.unwrap();

    assert_eq!(turfs.len(), 1);
    assert_eq!(turfs[0].id, "1");
    assert_eq!(turfs[0].owner_id.as_deref(), Some("7"));
    assert_eq!(turfs[0].sport_type, SportType::Football);
    assert_eq!(turfs[0].operating_end, time("22:00"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let backend = backend(50).await;

    let err = backend.get_turf("1").await.unwrap_err();

    assert!(matches!(err, BackendError::Timeout));
}

#[tokio::test]
async fn test_blocked_slot_lifecycle() {
    let backend = backend(2_000).await;
    let interval = NewBlockedInterval::new(TURF, &range("18:00", "20:00"));

    let created = backend.create_blocked_interval(&interval).await.unwrap();
    backend.delete_blocked_interval(&created.id).await.unwrap();

    assert_eq!(created.id, "x1");
    assert_eq!(created.end, time("20:00"));
    assert_eq!(created.turf_name.as_deref(), Some("Green Arena"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let vars = HashMap::from([("KICKOFF_API_URL", "http://127.0.0.1:1".to_string())]);
    let config = ClientConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.list_turfs().await.unwrap_err();

    assert!(matches!(err, BackendError::Transport(_)));
}

#[tokio::test]
async fn test_blocked_intervals_by_owner() {
    let backend = backend(2_000).await;

    let slots = backend.blocked_intervals_by_owner("7").await.unwrap();
    let none = backend.blocked_intervals_by_owner("8").await.unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].id, "11");
    assert_eq!(slots[0].resource_id, "1");
    assert_eq!(slots[0].start, time("18:00"));
    assert_eq!(slots[1].turf_name.as_deref(), Some("Baseline Club"));
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_gateway_timeout_is_a_status_error() {
    let backend = backend(2_000).await;

    let err = backend.bookings_by_requester(USER).await.unwrap_err();

    assert!(matches!(err, BackendError::Status { status: 504, .. }));
}
