//! Collection document types.
//!
//! A collection is an exported request collection: an ordered `item` list of
//! named request templates plus whatever metadata the exporting tool wrote.
//! Only the fields the executor reads are modelled; everything else is kept
//! in flattened maps so a parsed document round-trips without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the step that performs credential login.
///
/// Provisioning runs always operate on an externally obtained session, so a
/// step with exactly this name is never executed.
pub const LOGIN_STEP_NAME: &str = "Login";

/// The stored, ordered sequence of request templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    /// Steps in execution order.
    #[serde(default)]
    pub item: Vec<Step>,

    /// Collection metadata (`info`, `variable`, ...), preserved verbatim.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Collection {
    /// Parse a collection from a raw JSON document.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document)
    }

    /// Find every step whose name equals `name` exactly, in collection order.
    pub fn steps_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Step> + 'a {
        self.item.iter().filter(move |step| step.name == name)
    }
}

/// One named request template in a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Display name and filter key. Not guaranteed unique.
    pub name: String,

    /// The request template. Folder-like entries have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<StepRequest>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    /// The raw request body text, if the step carries one.
    pub fn raw_body(&self) -> Option<&str> {
        self.request
            .as_ref()
            .and_then(|r| r.body.as_ref())
            .and_then(|b| b.raw.as_deref())
    }

    /// Whether this is the credential login step.
    pub fn is_login(&self) -> bool {
        self.name == LOGIN_STEP_NAME
    }

    /// Whether the executor dispatches this step: it has a body and is not `Login`.
    pub fn is_executable(&self) -> bool {
        self.raw_body().is_some() && !self.is_login()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<StepBody>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepBody {
    /// JSON payload serialized as text, containing placeholder tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
