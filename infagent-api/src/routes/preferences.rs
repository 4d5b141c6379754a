//! Notification preference handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::models::preferences::{MonitoredWallet, NotificationPreferences};
use crate::state::AppState;

pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MonitoredWallet>, ServiceError> {
    let document = state.preferences.load(&user_id).await?;
    Ok(Json(document))
}

#[derive(Debug, Deserialize)]
pub struct SavePreferencesRequest {
    /// Absent for an unauthenticated user, which makes the save a no-op
    pub user_id: Option<String>,
    pub preferences: NotificationPreferences,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavePreferencesResponse {
    pub saved: bool,
}

pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SavePreferencesRequest>,
) -> Result<Json<SavePreferencesResponse>, ServiceError> {
    let saved = state
        .preferences
        .save(
            request.user_id.as_deref(),
            request.preferences,
            request.wallet_address,
        )
        .await?;
    Ok(Json(SavePreferencesResponse { saved }))
}
