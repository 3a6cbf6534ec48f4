pub mod blocked;
pub mod booking;
pub mod time_range;
pub mod turf;
pub mod wire;
