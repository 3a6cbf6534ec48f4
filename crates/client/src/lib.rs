//! # Kickoff Client
//!
//! Client side of turf bookings. It talks to the booking backend and drives
//! booking attempts through the submission state machine.
//!
//! ## Architecture
//!
//! - **Backend**: the [`BookingBackend`] contract and its error type
//! - **Http**: the REST implementation of that contract
//! - **Coordinator**: one booking attempt, from form fields to a confirmed booking
//! - **Service**: listings, cancellation and blocked-slot management
//! - **Config**: environment configuration
//! - **Mock**: test doubles for the backend

/// Backend contract shared by every implementation
pub mod backend;
/// Configuration loaded from the environment
pub mod config;
/// Booking submission state machine
pub mod coordinator;
/// REST backend
pub mod http;
/// Backend doubles for tests and local runs
pub mod mock;
/// Listing, cancellation and blocked-slot operations
pub mod service;

pub use backend::{BackendError, BookingBackend};
pub use config::ClientConfig;
pub use coordinator::{BookingCoordinator, PriceQuote, QuoteSource, SubmissionState, SubmitRequest};
pub use http::HttpBackend;
pub use service::{BookingService, Confirmation};
