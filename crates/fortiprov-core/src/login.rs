//! Device login exchange.
//!
//! Posts the `sys/login/user` JSON-RPC call and extracts the session token
//! the device issues. Nothing is cached: every provisioning run receives the
//! session from its caller.

use std::time::Duration;

use fortiprov_types::error::{LoginError, TransportError};
use fortiprov_types::login::{LoginRequest, LoginResponse};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::classify::render_value;
use crate::transport::{JsonRpcTransport, endpoint_url};

/// Default timeout for the login call in seconds.
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 10;

/// Detail used when a rejected login carries no device message.
pub const UNKNOWN_LOGIN_FAILURE: &str = "Unknown login failure";

/// Build the JSON-RPC login envelope.
pub fn login_payload(username: &str, password: &SecretString) -> Value {
    json!({
        "session": 1,
        "id": 1,
        "method": "exec",
        "params": [{
            "url": "sys/login/user",
            "data": [{
                "user": username,
                "passwd": password.expose_secret(),
            }]
        }]
    })
}

/// Log in to the device at `request.ip` and return the issued session.
pub async fn login<T: JsonRpcTransport>(
    transport: &T,
    request: &LoginRequest,
    timeout: Duration,
) -> Result<LoginResponse, LoginError> {
    let url = endpoint_url(&request.ip);
    let payload = login_payload(&request.username, &request.password);

    let reply = match transport.call(&url, &payload, timeout).await {
        Ok(reply) => reply,
        Err(TransportError::UnexpectedStatus(status)) => {
            warn!(host = %request.ip, status, "login returned HTTP error");
            return Err(LoginError::HttpStatus(status));
        }
        Err(e) => return Err(e.into()),
    };
    if !reply.is_success() {
        warn!(host = %request.ip, status = reply.status, "login returned HTTP error");
        return Err(LoginError::HttpStatus(reply.status));
    }

    if let Some(session) = reply.body.get("session") {
        info!(host = %request.ip, user = %request.username, "login succeeded");
        return Ok(LoginResponse {
            session: session.clone(),
            message: "Login successful".to_string(),
        });
    }

    let message = reply
        .body
        .pointer("/result/0/status/message")
        .map(render_value)
        .unwrap_or_else(|| UNKNOWN_LOGIN_FAILURE.to_string());
    warn!(host = %request.ip, user = %request.username, %message, "login rejected");
    Err(LoginError::Rejected(message))
}
