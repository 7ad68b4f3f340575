//! Provisioning run handler.

use axum::Json;
use axum::extract::State;

use fortiprov_types::provision::{ProvisionRequest, ProvisionResponse};

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

/// POST /api/provision - Run the collection (or one named step) against a device.
///
/// Per-step failures are reported inside `results`; only a missing step or
/// an unreadable collection fail the request.
pub async fn run_provision(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProvisionRequest>,
) -> Result<Json<ProvisionResponse>, AppError> {
    let scope = body.scope()?;
    let variables = body.variables();

    let results = state.executor.run(&body.ip, &scope, &variables).await?;

    Ok(Json(ProvisionResponse { results }))
}
