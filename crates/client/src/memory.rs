//! In-memory [`DiscountBackend`] for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{BookingId, Money};
use domain::{Discount, DiscountCode, DiscountStatus};

use crate::error::ClientError;
use crate::transport::{ApplicationResponse, DiscountBackend, ValidationResponse};

#[derive(Debug, Default)]
struct InMemoryBackendState {
    discounts: HashMap<DiscountCode, Discount>,
    applications: Vec<(DiscountCode, BookingId)>,
    fail_with: Option<String>,
    latency: Option<Duration>,
    validate_calls: usize,
}

/// Backend that answers from a set of registered discounts.
///
/// A code validates when it is registered, not expired, and not exhausted.
/// Applying a code records the booking and bumps the usage count.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscountBackend {
    state: Arc<RwLock<InMemoryBackendState>>,
}

impl InMemoryDiscountBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a discount.
    pub fn insert(&self, discount: Discount) {
        self.state
            .write()
            .unwrap()
            .discounts
            .insert(discount.code.clone(), discount);
    }

    /// Makes every call fail with a network error carrying `message`.
    pub fn set_failure(&self, message: Option<&str>) {
        self.state.write().unwrap().fail_with = message.map(str::to_string);
    }

    /// Delays every answer by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.write().unwrap().latency = latency;
    }

    /// Bookings that had a discount applied, in order.
    pub fn applications(&self) -> Vec<(DiscountCode, BookingId)> {
        self.state.read().unwrap().applications.clone()
    }

    /// Number of validation requests received.
    pub fn validate_calls(&self) -> usize {
        self.state.read().unwrap().validate_calls
    }

    async fn before_call(&self) -> Result<(), ClientError> {
        let (latency, failure) = {
            let state = self.state.read().unwrap();
            (state.latency, state.fail_with.clone())
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(message) => Err(ClientError::Network(message)),
            None => Ok(()),
        }
    }
}

fn rejection_reason(discount: Option<&Discount>) -> Option<&'static str> {
    let now = Utc::now();
    match discount {
        None => Some("Discount code not found"),
        Some(d) if d.status == DiscountStatus::Inactive => Some("Discount code is not active"),
        Some(d) if d.is_expired_at(now) => Some("Discount code has expired"),
        Some(d) if d.is_exhausted() => Some("Discount code has no uses left"),
        Some(_) => None,
    }
}

#[async_trait]
impl DiscountBackend for InMemoryDiscountBackend {
    async fn validate_code(
        &self,
        code: &DiscountCode,
        subtotal: Money,
    ) -> Result<ValidationResponse, ClientError> {
        self.state.write().unwrap().validate_calls += 1;
        self.before_call().await?;

        let state = self.state.read().unwrap();
        let discount = state.discounts.get(code).cloned();

        let response = match rejection_reason(discount.as_ref()) {
            Some(reason) => ValidationResponse {
                valid: false,
                reason: reason.to_string(),
                discount_code: discount,
                calculated_discount: None,
                final_price_cents: None,
            },
            None => {
                let calculation = discount
                    .as_ref()
                    .map(|d| d.calculate(subtotal));
                ValidationResponse {
                    valid: true,
                    reason: String::new(),
                    calculated_discount: calculation.map(|c| c.discount_amount.cents()),
                    final_price_cents: calculation.map(|c| c.final_price.cents()),
                    discount_code: discount,
                }
            }
        };
        Ok(response)
    }

    async fn apply_code(
        &self,
        code: &DiscountCode,
        booking_id: BookingId,
    ) -> Result<ApplicationResponse, ClientError> {
        self.before_call().await?;

        let mut state = self.state.write().unwrap();
        let reason = rejection_reason(state.discounts.get(code));
        if let Some(reason) = reason {
            return Ok(ApplicationResponse {
                success: false,
                message: reason.to_string(),
                discount_applied: None,
            });
        }

        let amount = match state.discounts.get_mut(code) {
            Some(discount) => {
                discount.current_uses += 1;
                discount.amount
            }
            None => {
                return Ok(ApplicationResponse {
                    success: false,
                    message: "Discount code not found".to_string(),
                    discount_applied: None,
                });
            }
        };
        state.applications.push((code.clone(), booking_id));

        Ok(ApplicationResponse {
            success: true,
            message: "Discount applied".to_string(),
            discount_applied: Some(amount),
        })
    }
}
