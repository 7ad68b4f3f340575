//! JSON-RPC transport port.
//!
//! Defined in fortiprov-core so the executor can dispatch requests without
//! depending on any HTTP client. The reqwest adapter lives in fortiprov-infra.

use std::time::Duration;

use fortiprov_types::error::TransportError;
use serde_json::Value;

/// A completed HTTP exchange with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcReply {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body.
    pub body: Value,
}

impl RpcReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON payload as an HTTP POST and parses the JSON reply.
///
/// Implementations report connection failures, timeouts and non-JSON bodies
/// as [`TransportError`]; they never interpret JSON-RPC semantics.
pub trait JsonRpcTransport: Send + Sync {
    fn call(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<RpcReply, TransportError>> + Send;
}

/// The device JSON-RPC endpoint for `host`. The host is not validated.
pub fn endpoint_url(host: &str) -> String {
    format!("https://{host}/jsonrpc")
}
