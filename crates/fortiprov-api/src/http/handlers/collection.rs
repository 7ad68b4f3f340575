//! Collection document handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use fortiprov_core::store::CollectionStore;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

/// GET /api/collection - Return the stored collection document verbatim.
pub async fn get_collection(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let document = state.executor.store().load().await?;
    Ok(Json(document))
}

/// POST /api/collection - Replace the stored collection document.
pub async fn update_collection(
    State(state): State<AppState>,
    ApiJson(document): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    state.executor.store().save(&document).await?;
    Ok(Json(json!({"message": "Collection updated successfully"})))
}
