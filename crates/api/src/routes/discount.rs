//! Discount endpoints for the checkout session.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use client::{ApplicationResult, DiscountBackend, ValidationResult};
use common::{BookingId, Money};
use domain::{Discount, DiscountCalculation, ErrorCategory, ErrorDisplay};
use serde::{Deserialize, Serialize};
use store::{CheckoutSession, DiscountPersistence, DiscountState, DiscountStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<P, B> {
    pub session: CheckoutSession<P, B>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SetCodeRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    /// Replaces the candidate code before validating when present.
    pub code: Option<String>,
    pub subtotal_cents: i64,
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub booking_id: u64,
}

#[derive(Deserialize)]
pub struct CalculationQuery {
    pub price_cents: i64,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSnapshot {
    #[serde(flatten)]
    pub state: DiscountState,
    pub has_discount: bool,
    pub discount_percentage: i64,
    pub remaining_uses: Option<u32>,
    pub is_single_use: bool,
    pub error_display: Option<ErrorDisplay>,
}

impl<P: DiscountPersistence> From<&DiscountStore<P>> for DiscountSnapshot {
    fn from(store: &DiscountStore<P>) -> Self {
        Self {
            state: store.state().clone(),
            has_discount: store.has_discount(),
            discount_percentage: store.discount_percentage(),
            remaining_uses: store.remaining_uses(),
            is_single_use: store.is_single_use(),
            error_display: store.error().map(|e| e.display()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub discount: Option<Discount>,
    pub discount_amount_cents: Option<i64>,
    pub final_price_cents: Option<i64>,
    pub error: Option<ErrorCategory>,
    pub message: Option<String>,
    pub error_display: Option<ErrorDisplay>,
}

impl From<ValidationResult> for ValidateResponse {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid {
                discount,
                discount_amount,
                final_price,
            } => Self {
                valid: true,
                discount: Some(discount),
                discount_amount_cents: Some(discount_amount.cents()),
                final_price_cents: Some(final_price.cents()),
                error: None,
                message: None,
                error_display: None,
            },
            ValidationResult::Invalid { error, message } => Self {
                valid: false,
                discount: None,
                discount_amount_cents: None,
                final_price_cents: None,
                error: Some(error),
                message: Some(message),
                error_display: Some(error.display()),
            },
        }
    }
}

// -- Handlers --

/// GET /discount: current session state with derived reads.
pub async fn snapshot<P, B>(State(state): State<Arc<AppState<P, B>>>) -> Json<DiscountSnapshot>
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    let store = state.session.store().await;
    Json(DiscountSnapshot::from(&*store))
}

/// PUT /discount/code: store the candidate code.
#[tracing::instrument(skip(state, req))]
pub async fn set_code<P, B>(
    State(state): State<Arc<AppState<P, B>>>,
    Json(req): Json<SetCodeRequest>,
) -> Json<DiscountSnapshot>
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    let mut store = state.session.store().await;
    store.set_code(&req.code);
    Json(DiscountSnapshot::from(&*store))
}

/// POST /discount/validate: validate the candidate code against a subtotal.
#[tracing::instrument(skip(state, req), fields(subtotal_cents = req.subtotal_cents))]
pub async fn validate<P, B>(
    State(state): State<Arc<AppState<P, B>>>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError>
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    let result = state
        .session
        .submit_code(req.code.as_deref(), Money::from_cents(req.subtotal_cents))
        .await?;

    Ok(Json(ValidateResponse::from(result)))
}

/// POST /discount/apply: commit the applied discount to a booking.
#[tracing::instrument(skip(state, req), fields(booking_id = req.booking_id))]
pub async fn apply<P, B>(
    State(state): State<Arc<AppState<P, B>>>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplicationResult>, ApiError>
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    let booking_id = BookingId::new(req.booking_id)
        .ok_or_else(|| ApiError::BadRequest("booking_id must be a positive integer".into()))?;

    Ok(Json(state.session.apply_to_booking(booking_id).await))
}

/// DELETE /discount: remove the applied discount and reset the session.
#[tracing::instrument(skip(state))]
pub async fn clear<P, B>(State(state): State<Arc<AppState<P, B>>>) -> StatusCode
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    state.session.store().await.clear();
    StatusCode::NO_CONTENT
}

/// GET /discount/calculation?price_cents=: checkout amounts for a price.
pub async fn calculation<P, B>(
    State(state): State<Arc<AppState<P, B>>>,
    Query(query): Query<CalculationQuery>,
) -> Result<Json<DiscountCalculation>, ApiError>
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    if query.price_cents < 0 {
        return Err(ApiError::BadRequest(
            "price_cents must not be negative".into(),
        ));
    }

    let store = state.session.store().await;
    Ok(Json(store.calculate(Money::from_cents(query.price_cents))))
}
