//! Risk check handler

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::services::risk::RiskCheckResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RiskCheckRequest {
    pub address: String,
    pub destination: Option<String>,
    /// When set, kick off insight generation for the source report after
    /// the check completes
    #[serde(default)]
    pub generate_insight: bool,
}

pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RiskCheckRequest>,
) -> Result<Json<RiskCheckResult>, ServiceError> {
    let result = state
        .risk
        .check_pair(&request.address, request.destination.as_deref())
        .await?;

    if request.generate_insight {
        state.insights.spawn_generate(result.source.clone());
    }

    Ok(Json(result))
}
