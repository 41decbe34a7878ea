//! Domain layer for discount codes.
//!
//! This crate provides:
//! - The `Discount` record as served by the booking backend
//! - Expiry and usage rules evaluated against a discount record
//! - `DiscountCalculation` for deriving checkout amounts in integer cents
//! - `ErrorCategory`, the closed set of validation failure categories

pub mod discount;
pub mod error_category;

pub use common::{BookingId, Money};
pub use discount::{
    Discount, DiscountCalculation, DiscountCode, DiscountKind, DiscountStatus,
};
pub use error_category::{ErrorCategory, ErrorDisplay, Severity};
