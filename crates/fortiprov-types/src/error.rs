use thiserror::Error;

/// Errors from the collection document backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection I/O error: {0}")]
    Io(String),

    #[error("collection is not valid JSON: {0}")]
    Parse(String),

    #[error("failed to serialize collection: {0}")]
    Serialize(String),

    #[error("collection document must be a JSON object")]
    NotAnObject,
}

/// Errors raised while talking to the device JSON-RPC endpoint.
///
/// These are transport-level failures only; API-level errors reported by the
/// device inside a well-formed reply are not represented here.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("response is not valid JSON: {0}")]
    Decode(String),

    /// Non-2xx reply whose body is not JSON, typically an HTML error page.
    #[error("device returned HTTP {0} with a non-JSON body")]
    UnexpectedStatus(u16),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Errors that abort a whole provisioning run.
///
/// Per-step failures are never surfaced through this type; they are recorded
/// as [`crate::provision::StepResult`] entries with an error status.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Step not found")]
    StepNotFound(String),

    #[error(transparent)]
    Collection(#[from] StoreError),

    #[error("invalid collection: {0}")]
    InvalidCollection(String),
}

/// Errors rejected before a run starts because the request itself is malformed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid scope '{0}': expected 'all' or 'single'")]
    InvalidScope(String),

    #[error("scope 'single' requires a step_name")]
    MissingStepName,
}

/// Errors from the device login exchange.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The device answered but did not issue a session.
    #[error("{0}")]
    Rejected(String),

    #[error("login failed with HTTP status {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
