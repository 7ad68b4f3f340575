//! Application error type mapping to HTTP status codes and `{"detail"}` bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fortiprov_types::error::{LoginError, ProvisionError, RequestError, StoreError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Run-level provisioning failure.
    Provision(ProvisionError),
    /// Collection read/write failure.
    Store(StoreError),
    /// Device login failure.
    Login(LoginError),
    /// Request body could not be decoded.
    Body(JsonRejection),
    /// Request decoded but is semantically invalid.
    Validation(String),
}

impl From<ProvisionError> for AppError {
    fn from(e: ProvisionError) -> Self {
        AppError::Provision(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        AppError::Login(e)
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Body(e)
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::Provision(ProvisionError::StepNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Step not found".to_string())
            }
            AppError::Provision(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Store(StoreError::NotAnObject) => {
                (StatusCode::BAD_REQUEST, StoreError::NotAnObject.to_string())
            }
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Login(LoginError::Rejected(msg)) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Login(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %detail, "request rejected");
        }

        let body = json!({ "detail": detail });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortiprov_types::error::TransportError;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_step_not_found_is_404() {
        let (status, body) =
            render(ProvisionError::StepNotFound("Create ADOM".to_string()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Step not found"}));
    }

    #[tokio::test]
    async fn test_collection_failure_is_500() {
        let err: AppError =
            ProvisionError::Collection(StoreError::Io("postman_collection.json: gone".into())).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "collection I/O error: postman_collection.json: gone");
    }

    #[tokio::test]
    async fn test_login_rejection_is_401_with_device_message() {
        let (status, body) = render(LoginError::Rejected("Login fail".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Login fail");
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_500() {
        let err: AppError =
            LoginError::Transport(TransportError::Request("connection refused".into())).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "connection refused");
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let (status, body) = render(RequestError::MissingStepName.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "scope 'single' requires a step_name");
    }

    #[tokio::test]
    async fn test_non_object_collection_is_400() {
        let (status, _) = render(StoreError::NotAnObject.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
