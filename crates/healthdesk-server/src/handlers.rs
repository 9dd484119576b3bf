//! Request handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{Json, extract::State};
use healthdesk_core::OperationDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub token: String,
    pub name: String,
    pub role: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = match state.users.authenticate(&req.username, &req.password) {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::warn!(username = %req.username, "login failed");
            return Err(ApiError::AuthenticationFailed);
        }
        Err(err) => {
            tracing::error!(error = %err, "cannot load user store");
            return Err(err.into());
        }
    };

    tracing::info!(username = %req.username, role = %session.role, "login succeeded");

    Ok(Json(LoginResponse {
        status: "success",
        message: "Login successful",
        token: session.token,
        name: session.name,
        role: session.role,
    }))
}

/// Shared handler for every script-backed operation.
pub async fn run_operation(
    state: &AppState,
    descriptor: &OperationDescriptor,
) -> Result<Json<Value>, ApiError> {
    state.dispatcher.dispatch(descriptor).await.map(Json)
}

/// GET /healthz: process liveness, never touches the scripts.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "healthdesk" }))
}
