//! HTTP facade over a checkout discount session.
//!
//! Exposes the discount store's actions and derived reads as JSON endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use client::{DiscountBackend, GraphQlBackend};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{CheckoutSession, DiscountPersistence, FilePersistence};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::discount::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P, B>(state: Arc<AppState<P, B>>, metrics_handle: PrometheusHandle) -> Router
where
    P: DiscountPersistence + 'static,
    B: DiscountBackend + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/discount",
            get(routes::discount::snapshot::<P, B>).delete(routes::discount::clear::<P, B>),
        )
        .route("/discount/code", put(routes::discount::set_code::<P, B>))
        .route("/discount/validate", post(routes::discount::validate::<P, B>))
        .route("/discount/apply", post(routes::discount::apply::<P, B>))
        .route(
            "/discount/calculation",
            get(routes::discount::calculation::<P, B>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given storage and backend.
///
/// Any stored discount is restored, or discarded if it has expired.
pub fn create_state<P, B>(persistence: P, backend: B, timeout: Duration) -> Arc<AppState<P, B>>
where
    P: DiscountPersistence,
    B: DiscountBackend + Clone,
{
    Arc::new(AppState {
        session: CheckoutSession::new(persistence, backend).with_timeout(timeout),
    })
}

/// Creates the production state: file storage and the GraphQL backend.
pub fn create_default_state(config: &Config) -> Arc<AppState<FilePersistence, GraphQlBackend>> {
    let client_config = config.client_config();
    create_state(
        FilePersistence::new(&config.storage_path),
        GraphQlBackend::from_config(&client_config),
        client_config.timeout,
    )
}
