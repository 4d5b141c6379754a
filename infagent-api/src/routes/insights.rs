//! Stored insight handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ServiceError;
use crate::models::insights::WalletInsight;
use crate::state::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<WalletInsight>>, ServiceError> {
    let insights = state.insights.list(&address).await?;
    Ok(Json(insights))
}

/// Run a fresh check for the address and kick off fire-and-forget
/// insight generation from its result
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let report = state.risk.check_address(&address).await?;
    state.insights.spawn_generate(report);
    Ok(StatusCode::ACCEPTED)
}
