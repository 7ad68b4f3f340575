//! Classification of device JSON-RPC replies.
//!
//! A pure function from the parsed reply to a step status and message, kept
//! separate from the network code so the decision table is testable alone:
//!
//! | reply shape                                               | status  | message                         |
//! |-----------------------------------------------------------|---------|---------------------------------|
//! | `result[0].status.code == 0`                              | success | `result[0].status.message`      |
//! | `result[0].status.code != 0`                              | error   | `FMG Error ({code}): {message}` |
//! | `result[0]` without `status`                              | success | `OK`                            |
//! | `result[0].status` not an object                          | error   | `Invalid FMG response format`   |
//! | no usable `result` list, `error` present                  | error   | the `error` value as text       |
//! | anything else                                             | error   | `Invalid FMG response format`   |

use fortiprov_types::provision::StepStatus;
use serde_json::Value;

/// Message for replies matching none of the known shapes.
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid FMG response format";

/// Message for a result entry that carries no status object.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "OK";

/// Status and human-readable message derived from a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StepStatus,
    pub message: String,
}

impl Classification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Error,
            message: message.into(),
        }
    }
}

/// Classify a parsed JSON-RPC reply body.
pub fn classify_response(body: &Value) -> Classification {
    let first_result = body
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first());

    if let Some(first) = first_result {
        return classify_result_entry(first);
    }

    if let Some(error) = body.get("error") {
        return Classification::error(render_value(error));
    }

    Classification::error(INVALID_RESPONSE_FORMAT)
}

fn classify_result_entry(entry: &Value) -> Classification {
    // A result entry without a status object is taken as success; see DESIGN.md.
    let Some(status) = entry.get("status") else {
        return Classification::success(DEFAULT_SUCCESS_MESSAGE);
    };
    let Some(status) = status.as_object() else {
        return Classification::error(INVALID_RESPONSE_FORMAT);
    };

    let code = status.get("code").unwrap_or(&Value::Null);
    let message = status.get("message").map(render_value).unwrap_or_default();

    if code.as_f64() == Some(0.0) {
        Classification::success(message)
    } else {
        Classification::error(format!("FMG Error ({}): {}", render_value(code), message))
    }
}

/// Strings verbatim, everything else as compact JSON.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
