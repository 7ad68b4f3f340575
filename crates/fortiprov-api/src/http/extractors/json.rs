//! JSON body extractor whose rejections use the API error format.

use axum::extract::FromRequest;

use crate::http::error::AppError;

/// Like [`axum::Json`], but a malformed body yields an [`AppError`] so the
/// client receives `{"detail": "..."}` instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
