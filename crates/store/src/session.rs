//! Checkout session: the store wired to the validation and application clients.

use std::time::Duration;

use chrono::Utc;
use client::{
    ApplicationClient, ApplicationResult, DiscountBackend, ValidationClient, ValidationResult,
};
use common::{BookingId, Money};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::SessionError;
use crate::persistence::DiscountPersistence;
use crate::store::DiscountStore;

/// Drives the discount flow for one checkout.
///
/// The store lock is never held across a backend call, so reads stay
/// responsive while a validation is in flight.
pub struct CheckoutSession<P, B> {
    store: Mutex<DiscountStore<P>>,
    validation: ValidationClient<B>,
    application: ApplicationClient<B>,
}

impl<P, B> CheckoutSession<P, B>
where
    P: DiscountPersistence,
    B: DiscountBackend + Clone,
{
    /// Creates a session and restores any stored discount.
    pub fn new(persistence: P, backend: B) -> Self {
        let mut store = DiscountStore::new(persistence);
        store.reconcile_on_load();
        Self {
            store: Mutex::new(store),
            validation: ValidationClient::new(backend.clone()),
            application: ApplicationClient::new(backend),
        }
    }

    /// Overrides the backend timeout for both clients.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.validation = self.validation.with_timeout(timeout);
        self.application = self.application.with_timeout(timeout);
        self
    }

    /// Locks the store for reads or direct actions.
    pub async fn store(&self) -> MutexGuard<'_, DiscountStore<P>> {
        self.store.lock().await
    }

    /// Validates the candidate code against `subtotal` and records the
    /// outcome in the store.
    ///
    /// `code`, when given, replaces the candidate code first; it is only
    /// written once the submission is accepted. Fails only if another
    /// validation is still running. A result that arrives after the store
    /// was cleared or a newer validation started is discarded.
    #[tracing::instrument(skip(self, code, subtotal), fields(subtotal_cents = subtotal.cents()))]
    pub async fn submit_code(
        &self,
        code: Option<&str>,
        subtotal: Money,
    ) -> Result<ValidationResult, SessionError> {
        let (code, ticket) = {
            let mut store = self.store.lock().await;
            if !store.status().can_submit() {
                return Err(SessionError::ValidationInProgress);
            }
            if let Some(code) = code {
                store.set_code(code);
            }
            let ticket = store.begin_validation();
            (store.code().clone(), ticket)
        };

        let result = self.validation.validate(code.as_str(), subtotal).await;

        let mut store = self.store.lock().await;
        if store.generation() == ticket {
            store.record_validation(&result);
        } else {
            tracing::debug!(
                ticket,
                current = store.generation(),
                "discarding stale validation result"
            );
        }
        Ok(result)
    }

    /// Commits the applied discount to `booking_id`.
    ///
    /// Fails without a backend call when no discount is applied, and drops a
    /// discount that has expired since it was validated.
    #[tracing::instrument(skip(self, booking_id), fields(booking_id = %booking_id))]
    pub async fn apply_to_booking(&self, booking_id: BookingId) -> ApplicationResult {
        let code = {
            let mut store = self.store.lock().await;
            match store.applied_discount().cloned() {
                None => return ApplicationResult::failure("No discount applied"),
                Some(discount) if discount.is_expired_at(Utc::now()) => {
                    tracing::info!(code = %discount.code, "applied discount expired before booking");
                    store.clear();
                    return ApplicationResult::failure("Discount has expired");
                }
                Some(discount) => discount.code,
            }
        };

        self.application.apply(code.as_str(), booking_id).await
    }
}
