//! Device login handler.

use axum::Json;
use axum::extract::State;

use fortiprov_core::login::login as device_login;
use fortiprov_types::login::{LoginRequest, LoginResponse};

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

/// POST /api/login - Exchange device credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = device_login(state.executor.transport(), &body, state.login_timeout()).await?;
    Ok(Json(response))
}
