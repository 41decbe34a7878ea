//! Backend trait and the response shapes it returns.

use async_trait::async_trait;
use common::{BookingId, Money};
use domain::{Discount, DiscountCode};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Answer to a validation request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub valid: bool,

    /// Failure reason from the backend; empty on success.
    #[serde(default)]
    pub reason: String,

    /// The matching record, if any, even when `valid` is false.
    #[serde(default, alias = "discount")]
    pub discount_code: Option<Discount>,

    #[serde(default)]
    pub calculated_discount: Option<i64>,

    #[serde(default)]
    pub final_price_cents: Option<i64>,
}

/// Answer to an application request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub success: bool,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub discount_applied: Option<i64>,
}

/// Raw access to the backend's discount operations.
///
/// Implementations report failures as `Err`; timeouts and the mapping into
/// user-facing results are handled by the clients built on top.
#[async_trait]
pub trait DiscountBackend: Send + Sync {
    /// Asks whether `code` can be used against `subtotal`.
    async fn validate_code(
        &self,
        code: &DiscountCode,
        subtotal: Money,
    ) -> Result<ValidationResponse, ClientError>;

    /// Commits `code` to a booking.
    async fn apply_code(
        &self,
        code: &DiscountCode,
        booking_id: BookingId,
    ) -> Result<ApplicationResponse, ClientError>;
}
