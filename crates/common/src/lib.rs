//! Shared value types used across the discount checkout crates.

pub mod types;

pub use types::{BookingId, Money};
