//! Discount code validation against an order subtotal.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use common::Money;
use domain::{Discount, DiscountCalculation, DiscountCode, ErrorCategory};

use crate::config::DEFAULT_TIMEOUT;
use crate::error::ClientError;
use crate::transport::{DiscountBackend, ValidationResponse};

/// Outcome of a validation request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The code can be used; amounts are in cents of the submitted subtotal.
    Valid {
        discount: Discount,
        discount_amount: Money,
        final_price: Money,
    },
    /// The code cannot be used.
    Invalid {
        error: ErrorCategory,
        message: String,
    },
}

impl ValidationResult {
    fn invalid(error: ErrorCategory, message: impl Into<String>) -> Self {
        metrics::counter!("discount_validation_failures_total", "category" => error.as_str())
            .increment(1);
        ValidationResult::Invalid {
            error,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn discount(&self) -> Option<&Discount> {
        match self {
            ValidationResult::Valid { discount, .. } => Some(discount),
            ValidationResult::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<ErrorCategory> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { error, .. } => Some(*error),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { message, .. } => Some(message),
        }
    }
}

/// Validates discount codes through a [`DiscountBackend`].
///
/// Each call is bounded by a timeout; a call that runs past it is dropped
/// and reported as [`ErrorCategory::NetworkError`].
#[derive(Debug, Clone)]
pub struct ValidationClient<B> {
    backend: B,
    timeout: Duration,
}

impl<B: DiscountBackend> ValidationClient<B> {
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

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates `raw_code` against `subtotal`.
    ///
    /// The code is trimmed and uppercased before it is sent. This never
    /// fails; every problem is reported through [`ValidationResult::Invalid`].
    #[tracing::instrument(skip(self, subtotal), fields(subtotal_cents = subtotal.cents()))]
    pub async fn validate(&self, raw_code: &str, subtotal: Money) -> ValidationResult {
        metrics::counter!("discount_validations_total").increment(1);

        let code = DiscountCode::normalize(raw_code);
        if code.is_empty() {
            return ValidationResult::invalid(
                ErrorCategory::InvalidCode,
                "Please enter a discount code",
            );
        }
        if subtotal.is_negative() {
            return ValidationResult::invalid(
                ErrorCategory::UnknownError,
                "Subtotal must not be negative",
            );
        }

        let started = Instant::now();
        let outcome =
            tokio::time::timeout(self.timeout, self.backend.validate_code(&code, subtotal)).await;
        metrics::histogram!("discount_backend_request_duration_seconds", "operation" => "validate")
            .record(started.elapsed().as_secs_f64());

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::warn!(%code, error = %err, "discount validation request failed");
                return ValidationResult::invalid(ErrorCategory::NetworkError, err.to_string());
            }
            Err(_) => {
                tracing::warn!(
                    %code,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "discount validation timed out"
                );
                return ValidationResult::invalid(
                    ErrorCategory::NetworkError,
                    ClientError::Timeout.to_string(),
                );
            }
        };

        let result = interpret(subtotal, response, Utc::now());
        match &result {
            ValidationResult::Valid { discount_amount, .. } => {
                tracing::info!(%code, discount_cents = discount_amount.cents(), "discount code valid");
            }
            ValidationResult::Invalid { error, .. } => {
                tracing::info!(%code, category = %error, "discount code rejected");
            }
        }
        result
    }
}

/// Maps a backend answer into a [`ValidationResult`].
fn interpret(subtotal: Money, response: ValidationResponse, now: DateTime<Utc>) -> ValidationResult {
    if !response.valid {
        let category = ErrorCategory::classify(response.discount_code.as_ref(), now);
        let message = if response.reason.trim().is_empty() {
            category.display().description.to_string()
        } else {
            response.reason
        };
        return ValidationResult::invalid(category, message);
    }

    let Some(discount) = response.discount_code else {
        return ValidationResult::invalid(
            ErrorCategory::UnknownError,
            "Discount response did not include the discount",
        );
    };

    let calculation = match (response.calculated_discount, response.final_price_cents) {
        (Some(amount), _) => DiscountCalculation::from_amounts(subtotal, Money::from_cents(amount)),
        (None, Some(final_price)) => match subtotal.cents().checked_sub(final_price) {
            Some(amount) => DiscountCalculation::from_amounts(subtotal, Money::from_cents(amount)),
            None => {
                tracing::warn!(final_price, "backend final price out of range, recalculating");
                discount.calculate(subtotal)
            }
        },
        (None, None) => discount.calculate(subtotal),
    };

    if let Some(final_price) = response.final_price_cents
        && final_price != calculation.final_price.cents()
    {
        tracing::debug!(
            backend_final = final_price,
            derived_final = calculation.final_price.cents(),
            "backend final price disagrees with discount amount"
        );
    }

    ValidationResult::Valid {
        discount,
        discount_amount: calculation.discount_amount,
        final_price: calculation.final_price,
    }
}
