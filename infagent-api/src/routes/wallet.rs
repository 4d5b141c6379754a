//! Wallet session handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infagent_wallet::account::ProviderKind;

use crate::error::ServiceError;
use crate::services::wallet::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub session_id: Option<Uuid>,
    pub provider: ProviderKind,
}

pub async fn connect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state.wallet.connect(request.session_id, request.provider).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session_id: Uuid,
}

pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state.wallet.disconnect(request.session_id).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct AddAccountRequest {
    pub session_id: Option<Uuid>,
    pub address: String,
}

pub async fn add_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddAccountRequest>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state
        .wallet
        .add_manual(request.session_id, &request.address)
        .await?;
    Ok(Json(view))
}

pub async fn accounts(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state.wallet.accounts(session_id).await?;
    Ok(Json(view))
}

pub async fn remove_account(
    State(state): State<Arc<AppState>>,
    Path((session_id, address)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state.wallet.remove_account(session_id, &address).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct SetMainRequest {
    pub session_id: Uuid,
    pub address: String,
}

pub async fn set_main(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetMainRequest>,
) -> Result<Json<SessionView>, ServiceError> {
    let view = state.wallet.set_main(request.session_id, &request.address).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub signature: String,
}

pub async fn sign(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignResponse>, ServiceError> {
    let signature = state.wallet.sign(request.session_id, &request.message).await?;
    Ok(Json(SignResponse { signature }))
}

pub async fn sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionView>, ServiceError> {
    state.wallet.sync(request.session_id).await?;
    let view = state.wallet.accounts(request.session_id).await?;
    Ok(Json(view))
}
