//! ReqwestTransport -- concrete [`JsonRpcTransport`] over HTTPS.
//!
//! Posts JSON payloads to the device endpoint with a per-call timeout.
//! Certificate verification can be switched off for devices that present
//! self-signed certificates; doing so is logged once at construction.

use std::time::Duration;

use fortiprov_core::transport::{JsonRpcTransport, RpcReply};
use fortiprov_types::error::TransportError;
use serde_json::Value;

/// Device JSON-RPC client backed by a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given TLS verification policy.
    pub fn new(accept_invalid_certs: bool) -> Result<Self, TransportError> {
        if accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification is disabled for device connections \
                 (device.accept_invalid_certs = true)"
            );
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl JsonRpcTransport for ReqwestTransport {
    async fn call(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<RpcReply, TransportError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, TransportError::Request))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(e, TransportError::Request))?;

        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(TransportError::UnexpectedStatus(status.as_u16()));
            }
            Err(e) => return Err(TransportError::Decode(e.to_string())),
        };

        let status = status.as_u16();
        tracing::trace!(url, status, "device replied");
        Ok(RpcReply { status, body })
    }
}

/// Map a reqwest error to a timeout, or to `otherwise` for everything else.
fn classify_error(err: reqwest::Error, otherwise: fn(String) -> TransportError) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        otherwise(err.to_string())
    }
}
