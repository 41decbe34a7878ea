//! Committing a validated discount code to a booking.

use std::time::{Duration, Instant};

use common::BookingId;
use domain::DiscountCode;
use serde::Serialize;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::ClientError;
use crate::transport::DiscountBackend;

/// Outcome of an application request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResult {
    pub success: bool,
    pub message: String,
    /// Magnitude of the discount the backend applied, on success.
    pub discount_applied: Option<i64>,
}

impl ApplicationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        metrics::counter!("discount_application_failures_total").increment(1);
        Self {
            success: false,
            message: message.into(),
            discount_applied: None,
        }
    }
}

/// Applies discount codes to bookings through a [`DiscountBackend`].
///
/// Assumes the code was validated beforehand and does not classify failures.
#[derive(Debug, Clone)]
pub struct ApplicationClient<B> {
    backend: B,
    timeout: Duration,
}

impl<B: DiscountBackend> ApplicationClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Applies `raw_code` to `booking_id`. Never fails.
    #[tracing::instrument(skip(self, booking_id), fields(booking_id = %booking_id))]
    pub async fn apply(&self, raw_code: &str, booking_id: BookingId) -> ApplicationResult {
        metrics::counter!("discount_applications_total").increment(1);

        let code = DiscountCode::normalize(raw_code);
        if code.is_empty() {
            return ApplicationResult::failure("Discount code is required");
        }

        let started = Instant::now();
        let outcome =
            tokio::time::timeout(self.timeout, self.backend.apply_code(&code, booking_id)).await;
        metrics::histogram!("discount_backend_request_duration_seconds", "operation" => "apply")
            .record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(response)) if response.success => {
                tracing::info!(%code, "discount applied to booking");
                ApplicationResult {
                    success: true,
                    message: response.message,
                    discount_applied: response.discount_applied,
                }
            }
            Ok(Ok(response)) => {
                tracing::info!(%code, message = %response.message, "discount application rejected");
                let message = if response.message.trim().is_empty() {
                    "Discount could not be applied".to_string()
                } else {
                    response.message
                };
                ApplicationResult::failure(message)
            }
            Ok(Err(err)) => {
                tracing::warn!(%code, error = %err, "discount application request failed");
                ApplicationResult::failure(err.to_string())
            }
            Err(_) => {
                tracing::warn!(%code, "discount application timed out");
                ApplicationResult::failure(ClientError::Timeout.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::Discount;

    use super::*;
    use crate::memory::InMemoryDiscountBackend;

    fn booking(id: u64) -> BookingId {
        BookingId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_apply_success() {
        let backend = InMemoryDiscountBackend::new();
        backend.insert(Discount::percentage("SUMMER20", 20));
        let client = ApplicationClient::new(backend.clone());

        let result = client.apply(" summer20", booking(42)).await;

        assert!(result.success);
        assert_eq!(result.message, "Discount applied");
        assert_eq!(result.discount_applied, Some(20));
        assert_eq!(
            backend.applications(),
            vec![(DiscountCode::from("SUMMER20"), booking(42))]
        );
    }

    #[tokio::test]
    async fn test_apply_rejected_keeps_backend_message() {
        let client = ApplicationClient::new(InMemoryDiscountBackend::new());

        let result = client.apply("UNKNOWN", booking(1)).await;

        assert!(!result.success);
        assert_eq!(result.message, "Discount code not found");
        assert_eq!(result.discount_applied, None);
    }

    #[tokio::test]
    async fn test_apply_empty_code() {
        let client = ApplicationClient::new(InMemoryDiscountBackend::new());
        let result = client.apply("  ", booking(1)).await;
        assert_eq!(result, ApplicationResult::failure("Discount code is required"));
    }

    #[tokio::test]
    async fn test_apply_transport_failure() {
        let backend = InMemoryDiscountBackend::new();
        backend.set_failure(Some("connection reset"));
        let client = ApplicationClient::new(backend);

        let result = client.apply("SUMMER20", booking(1)).await;

        assert!(!result.success);
        assert_eq!(result.message, "Network error: connection reset");
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_timeout() {
        let backend = InMemoryDiscountBackend::new();
        backend.insert(Discount::percentage("SUMMER20", 20));
        backend.set_latency(Some(Duration::from_secs(30)));
        let client = ApplicationClient::new(backend.clone());

        let result = client.apply("SUMMER20", booking(1)).await;

        assert_eq!(result, ApplicationResult::failure("Request timeout"));
        assert!(backend.applications().is_empty());
    }
}
