//! HTTP routes for the dashboard

pub mod health;
pub mod insights;
pub mod preferences;
pub mod risk;
pub mod wallet;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the dashboard-facing router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/wallet/connect", post(wallet::connect))
        .route("/wallet/disconnect", post(wallet::disconnect))
        .route("/wallet/accounts", post(wallet::add_account))
        .route("/wallet/accounts/:session_id", get(wallet::accounts))
        .route(
            "/wallet/accounts/:session_id/:address",
            delete(wallet::remove_account),
        )
        .route("/wallet/main", post(wallet::set_main))
        .route("/wallet/sign", post(wallet::sign))
        .route("/wallet/sync", post(wallet::sync))
        .route("/risk/check", post(risk::check))
        .route("/preferences/:user_id", get(preferences::load))
        .route("/preferences", put(preferences::save))
        .route(
            "/insights/:address",
            get(insights::list).post(insights::generate),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
