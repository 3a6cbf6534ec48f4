//! Test doubles for [`BookingBackend`](crate::backend::BookingBackend).

pub mod backend;
pub mod memory;

pub use backend::MockBackend;
pub use memory::InMemoryBackend;
