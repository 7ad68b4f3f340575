//! Provisioning run types: request, scope, variable set, and step results.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// Which steps of the collection a run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every step in collection order.
    All,
    /// Only steps whose name equals the given name exactly.
    Single(String),
}

impl Scope {
    /// Build a scope from its wire form (`"all"` / `"single"` + step name).
    pub fn parse(scope: &str, step_name: Option<&str>) -> Result<Self, RequestError> {
        match scope {
            "all" => Ok(Scope::All),
            "single" => match step_name {
                Some(name) if !name.is_empty() => Ok(Scope::Single(name.to_string())),
                _ => Err(RequestError::MissingStepName),
            },
            other => Err(RequestError::InvalidScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Single(name) => write!(f, "single:{name}"),
        }
    }
}

/// Variable name to value mapping applied to every step body of a run.
///
/// Values may include the session token, so `Debug` prints keys only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VariableSet(BTreeMap<String, String>);

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for VariableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Body of `POST /api/provision`.
#[derive(Debug, Deserialize)]
pub struct ProvisionRequest {
    /// Device host (IP or hostname), used as `https://{ip}/jsonrpc`.
    pub ip: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub session: SecretString,
    pub adom: String,
    pub dns_primary: String,
    pub dns_secondary: String,
    pub faz_target_ip: String,
    pub faz_target_sn: String,
    pub corp_lan_subnet: String,
    pub corp_lan_netmask: String,
    /// `"all"` or `"single"`.
    pub scope: String,
    #[serde(default)]
    pub step_name: Option<String>,
}

impl ProvisionRequest {
    /// The validated run scope.
    pub fn scope(&self) -> Result<Scope, RequestError> {
        Scope::parse(&self.scope, self.step_name.as_deref())
    }

    /// The variable set for this run, including the session token as `session`.
    pub fn variables(&self) -> VariableSet {
        VariableSet::from_iter([
            ("session", self.session.expose_secret()),
            ("adom", self.adom.as_str()),
            ("dns_primary", self.dns_primary.as_str()),
            ("dns_secondary", self.dns_secondary.as_str()),
            ("faz_target_ip", self.faz_target_ip.as_str()),
            ("faz_target_sn", self.faz_target_sn.as_str()),
            ("corp_lan_subnet", self.corp_lan_subnet.as_str()),
            ("corp_lan_netmask", self.corp_lan_netmask.as_str()),
        ])
    }
}

/// Outcome classification of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

impl StepStatus {
    pub fn is_success(self) -> bool {
        self == StepStatus::Success
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "success"),
            StepStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of one executed step. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    pub message: String,
    /// Parsed device reply; only present when the HTTP exchange succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl StepResult {
    /// A step that failed before a reply was obtained.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Error,
            message: message.into(),
            response: None,
        }
    }

    /// A step whose HTTP exchange completed, classified from the reply.
    pub fn dispatched(
        name: impl Into<String>,
        status: StepStatus,
        message: impl Into<String>,
        response: Value,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            response: Some(response),
        }
    }
}

/// Body returned by `POST /api/provision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub results: Vec<StepResult>,
}

impl ProvisionResponse {
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.status.is_success())
            .count()
    }
}

/// Deserialize a plain JSON string into a [`SecretString`].
pub(crate) fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
