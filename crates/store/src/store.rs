//! The discount state store.

use chrono::{DateTime, Utc};
use client::ValidationResult;
use common::Money;
use domain::{Discount, DiscountCalculation, DiscountCode, ErrorCategory};

use crate::persistence::DiscountPersistence;
use crate::state::{DiscountState, ValidationStatus};

/// Single source of truth for one session's discount state.
///
/// At most one discount is applied at a time. Only the actions below mutate
/// the state; every other accessor is a pure read.
#[derive(Debug)]
pub struct DiscountStore<P> {
    state: DiscountState,
    persistence: P,
    /// Bumped by every `begin_validation` and `clear`.
    generation: u64,
}

impl<P: DiscountPersistence> DiscountStore<P> {
    /// Creates a store in the initial idle state.
    ///
    /// Nothing is loaded until [`reconcile_on_load`](Self::reconcile_on_load).
    pub fn new(persistence: P) -> Self {
        Self {
            state: DiscountState::default(),
            persistence,
            generation: 0,
        }
    }

    pub fn state(&self) -> &DiscountState {
        &self.state
    }

    pub fn code(&self) -> &DiscountCode {
        &self.state.code
    }

    pub fn status(&self) -> ValidationStatus {
        self.state.status
    }

    pub fn applied_discount(&self) -> Option<&Discount> {
        self.state.applied_discount.as_ref()
    }

    pub fn error(&self) -> Option<ErrorCategory> {
        self.state.error
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Identifies the current validation attempt.
    ///
    /// A result may only be recorded while this still equals the value
    /// returned by the [`begin_validation`](Self::begin_validation) that
    /// started it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Actions --

    /// Stores the candidate code. Editing dismisses a shown result.
    pub fn set_code(&mut self, raw: &str) {
        self.state.code = DiscountCode::normalize(raw);
        if self.state.error.is_some() || self.state.status == ValidationStatus::Valid {
            self.state.error = None;
            self.state.status = ValidationStatus::Idle;
        }
    }

    /// Marks a validation as in flight and clears any previous error.
    ///
    /// Returns the generation that identifies this attempt.
    pub fn begin_validation(&mut self) -> u64 {
        self.generation += 1;
        self.state.status = ValidationStatus::Validating;
        self.state.error = None;
        self.generation
    }

    /// Records an accepted discount and persists it.
    pub fn apply_valid(&mut self, discount: Discount) {
        tracing::debug!(code = %discount.code, "discount applied to session");
        self.persist(Some(&discount));
        self.state.applied_discount = Some(discount);
        self.state.status = ValidationStatus::Valid;
        self.state.error = None;
        self.state.code = DiscountCode::default();
    }

    /// Records a rejection. Any previously applied discount is dropped.
    pub fn apply_error(&mut self, category: ErrorCategory) {
        tracing::debug!(%category, "discount rejected for session");
        if self.state.applied_discount.take().is_some() {
            self.persist(None);
        }
        self.state.error = Some(category);
        self.state.status = ValidationStatus::Error;
    }

    /// Resets to the initial state and removes the stored discount.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = DiscountState::default();
        self.persist(None);
    }

    /// Routes a validation outcome into [`apply_valid`](Self::apply_valid)
    /// or [`apply_error`](Self::apply_error).
    pub fn record_validation(&mut self, result: &ValidationResult) {
        match result {
            ValidationResult::Valid { discount, .. } => self.apply_valid(discount.clone()),
            ValidationResult::Invalid { error, .. } => self.apply_error(*error),
        }
    }

    /// Restores the stored discount at startup, discarding it if it has
    /// expired or been deactivated.
    pub fn reconcile_on_load(&mut self) {
        self.reconcile_on_load_at(Utc::now());
    }

    pub fn reconcile_on_load_at(&mut self, now: DateTime<Utc>) {
        match self.persistence.load() {
            Some(discount) if discount.is_expired_at(now) => {
                tracing::info!(code = %discount.code, status = %discount.status, "discarding expired stored discount");
                self.clear();
            }
            Some(discount) => {
                tracing::info!(code = %discount.code, "restored stored discount");
                self.state = DiscountState {
                    applied_discount: Some(discount),
                    ..DiscountState::default()
                };
            }
            None => {
                self.state = DiscountState::default();
            }
        }
    }

    // -- Derived reads --

    pub fn has_discount(&self) -> bool {
        self.state.applied_discount.is_some()
    }

    /// Percentage of the applied discount, 0 for fixed amounts or none.
    pub fn discount_percentage(&self) -> i64 {
        self.applied_discount()
            .map(Discount::effective_percentage)
            .unwrap_or(0)
    }

    /// Remaining uses of the applied discount; `None` if uncapped or none.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.applied_discount().and_then(Discount::remaining_uses)
    }

    pub fn is_single_use(&self) -> bool {
        self.applied_discount().is_some_and(Discount::is_single_use)
    }

    /// Checkout amounts for `price` under the applied discount.
    pub fn calculate(&self, price: Money) -> DiscountCalculation {
        match self.applied_discount() {
            Some(discount) => discount.calculate(price),
            None => DiscountCalculation::none(price),
        }
    }

    fn persist(&self, discount: Option<&Discount>) {
        if let Err(err) = self.persistence.save(discount) {
            tracing::warn!(error = %err, "failed to persist applied discount");
        }
    }
}
