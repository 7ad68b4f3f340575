//! Provisioning executor: sequential execution of collection steps.
//!
//! One run loads the collection, narrows it to the requested scope, then for
//! each eligible step substitutes the run's variables into the raw body,
//! parses it, posts it to the device endpoint and classifies the reply.
//!
//! # Failure tiers
//!
//! - **Run-level:** the collection cannot be loaded or parsed, or a `single`
//!   scope names a step that does not exist. Returned as [`ProvisionError`]
//!   before any request is sent.
//! - **Step-level:** invalid JSON after substitution, transport failure, or
//!   an error reported by the device. Recorded as a [`StepResult`] with
//!   [`StepStatus::Error`]; the run continues with the next step.
//!
//! Steps are dispatched strictly one after another; later steps may rely on
//! objects created by earlier ones.

use std::time::Duration;

use fortiprov_types::collection::{Collection, Step};
use fortiprov_types::error::ProvisionError;
use fortiprov_types::provision::{Scope, StepResult, StepStatus, VariableSet};
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::classify::classify_response;
use crate::store::CollectionStore;
use crate::substitute::{placeholder_names, substitute};
use crate::transport::{JsonRpcTransport, endpoint_url};

/// Default per-step request timeout in seconds.
pub const DEFAULT_STEP_TIMEOUT_SECS: u64 = 30;

/// Message recorded when a substituted body is not valid JSON.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body after substitution";

/// Runs provisioning collections against a device.
pub struct ProvisioningExecutor<S, T> {
    store: S,
    transport: T,
    step_timeout: Duration,
}

impl<S, T> ProvisioningExecutor<S, T>
where
    S: CollectionStore,
    T: JsonRpcTransport,
{
    pub fn new(store: S, transport: T) -> Self {
        Self {
            store,
            transport,
            step_timeout: Duration::from_secs(DEFAULT_STEP_TIMEOUT_SECS),
        }
    }

    /// Override the per-step request timeout.
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute the collection against `host` and return one result per
    /// executed step, in collection order.
    pub async fn run(
        &self,
        host: &str,
        scope: &Scope,
        variables: &VariableSet,
    ) -> Result<Vec<StepResult>, ProvisionError> {
        let document = self.store.load().await?;
        let collection = Collection::from_document(document)
            .map_err(|e| ProvisionError::InvalidCollection(e.to_string()))?;
        let steps = select_steps(&collection, scope)?;

        let url = endpoint_url(host);
        info!(
            host,
            %scope,
            candidates = steps.len(),
            "starting provisioning run"
        );

        let mut results = Vec::with_capacity(steps.len());
        for step in steps {
            let Some(raw_body) = step.raw_body() else {
                debug!(step = %step.name, "skipping step without request body");
                continue;
            };
            if step.is_login() {
                debug!("skipping Login step, session is supplied by the caller");
                continue;
            }

            let span = info_span!("provision.step", step = %step.name);
            let result = self
                .run_step(&step.name, raw_body, &url, variables)
                .instrument(span)
                .await;
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.status.is_success()).count();
        info!(
            host,
            executed = results.len(),
            failed,
            "provisioning run finished"
        );

        Ok(results)
    }

    async fn run_step(
        &self,
        name: &str,
        raw_body: &str,
        url: &str,
        variables: &VariableSet,
    ) -> StepResult {
        let body = substitute(raw_body, variables);

        let unresolved = placeholder_names(&body);
        if !unresolved.is_empty() {
            warn!(?unresolved, "step body still contains placeholders");
        }

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "step body is not valid JSON after substitution");
                return StepResult::failed(name, INVALID_BODY_MESSAGE);
            }
        };

        match self.transport.call(url, &payload, self.step_timeout).await {
            Ok(reply) => {
                let classification = classify_response(&reply.body);
                match classification.status {
                    StepStatus::Success => debug!(
                        http_status = reply.status,
                        message = %classification.message,
                        "step succeeded"
                    ),
                    StepStatus::Error => warn!(
                        http_status = reply.status,
                        message = %classification.message,
                        "device reported an error"
                    ),
                }
                StepResult::dispatched(
                    name,
                    classification.status,
                    classification.message,
                    reply.body,
                )
            }
            Err(e) => {
                warn!(error = %e, "step request failed");
                StepResult::failed(name, e.to_string())
            }
        }
    }
}

/// Narrow the collection to the steps a run considers, in collection order.
///
/// A `single` scope that matches nothing fails the whole run.
pub fn select_steps<'a>(
    collection: &'a Collection,
    scope: &'a Scope,
) -> Result<Vec<&'a Step>, ProvisionError> {
    match scope {
        Scope::All => Ok(collection.item.iter().collect()),
        Scope::Single(name) => {
            let steps: Vec<&Step> = collection.steps_named(name).collect();
            if steps.is_empty() {
                return Err(ProvisionError::StepNotFound(name.clone()));
            }
            Ok(steps)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use fortiprov_types::error::{StoreError, TransportError};
    use serde_json::json;

    use super::*;
    use crate::transport::RpcReply;

    // -- Mock store --

    struct MemoryStore {
        document: Option<Value>,
    }

    impl MemoryStore {
        fn with(document: Value) -> Self {
            Self {
                document: Some(document),
            }
        }

        fn unreadable() -> Self {
            Self { document: None }
        }
    }

    impl CollectionStore for MemoryStore {
        async fn load(&self) -> Result<Value, StoreError> {
            self.document
                .clone()
                .ok_or_else(|| StoreError::Io("No such file or directory".to_string()))
        }

        async fn save(&self, _document: &Value) -> Result<(), StoreError> {
            Ok(())
        }
    }

    // -- Mock transport --

    /// Replays scripted replies in order and records every call.
    /// Once the script is exhausted it answers with a plain success.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<RpcReply, TransportError>>>,
        calls: Mutex<Vec<(String, Value, Duration)>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<RpcReply, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn payloads(&self) -> Vec<Value> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, payload, _)| payload.clone())
                .collect()
        }
    }

    impl JsonRpcTransport for ScriptedTransport {
        async fn call(
            &self,
            url: &str,
            payload: &Value,
            timeout: Duration,
        ) -> Result<RpcReply, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone(), timeout));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ok_reply()))
        }
    }

    fn ok_reply() -> RpcReply {
        RpcReply {
            status: 200,
            body: json!({"id": 1, "result": [{"status": {"code": 0, "message": "OK"}, "url": "/x"}]}),
        }
    }

    fn reply(body: Value) -> Result<RpcReply, TransportError> {
        Ok(RpcReply { status: 200, body })
    }

    fn step(name: &str, raw: &str) -> Value {
        json!({"name": name, "request": {"method": "POST", "body": {"mode": "raw", "raw": raw}}})
    }

    fn collection(steps: Vec<Value>) -> Value {
        json!({"info": {"name": "onboarding"}, "item": steps})
    }

    fn vars() -> VariableSet {
        VariableSet::from_iter([
            ("session", "tok"),
            ("adom", "root"),
            ("dns_primary", "8.8.8.8"),
        ])
    }

    fn executor(
        store: MemoryStore,
        transport: ScriptedTransport,
    ) -> ProvisioningExecutor<MemoryStore, ScriptedTransport> {
        ProvisioningExecutor::new(store, transport)
    }

    // -----------------------------------------------------------------------
    // Scope and skipping
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_all_scope_runs_executable_steps_in_order() {
        let exec = executor(
            MemoryStore::with(collection(vec![
                step("Login", r#"{"method": "exec"}"#),
                step("Create ADOM", r#"{"adom": "$(adom)"}"#),
                json!({"name": "Folder"}),
                json!({"name": "No body", "request": {"method": "GET"}}),
                step("Set DNS", r#"{"dns": "{{dns_primary}}"}"#),
            ])),
            ScriptedTransport::default(),
        );

        let results = exec.run("10.0.0.1", &Scope::All, &vars()).await.unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Create ADOM", "Set DNS"]);
        assert!(results.iter().all(|r| r.status == StepStatus::Success));
        assert_eq!(
            exec.transport().payloads(),
            vec![json!({"adom": "root"}), json!({"dns": "8.8.8.8"})]
        );
    }

    #[tokio::test]
    async fn test_requests_go_to_device_endpoint_with_step_timeout() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}")])),
            ScriptedTransport::default(),
        )
        .with_step_timeout(Duration::from_secs(7));

        exec.run("fmg.lab", &Scope::All, &vars()).await.unwrap();

        let calls = exec.transport().calls.lock().unwrap();
        assert_eq!(calls[0].0, "https://fmg.lab/jsonrpc");
        assert_eq!(calls[0].2, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_default_step_timeout_is_thirty_seconds() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}")])),
            ScriptedTransport::default(),
        );
        exec.run("h", &Scope::All, &vars()).await.unwrap();
        assert_eq!(
            exec.transport().calls.lock().unwrap()[0].2,
            Duration::from_secs(30)
        );
    }

    #[tokio::test]
    async fn test_login_step_skipped_even_when_selected() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("Login", "{}"), step("A", "{}")])),
            ScriptedTransport::default(),
        );

        let results = exec
            .run("h", &Scope::Single("Login".to_string()), &vars())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(exec.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_scope_runs_every_step_with_that_name() {
        let exec = executor(
            MemoryStore::with(collection(vec![
                step("Create VLAN", r#"{"n": 1}"#),
                step("Other", r#"{"n": 2}"#),
                step("Create VLAN", r#"{"n": 3}"#),
            ])),
            ScriptedTransport::default(),
        );

        let results = exec
            .run("h", &Scope::Single("Create VLAN".to_string()), &vars())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            exec.transport().payloads(),
            vec![json!({"n": 1}), json!({"n": 3})]
        );
    }

    #[tokio::test]
    async fn test_single_scope_unknown_step_fails_before_any_call() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}"), step("B", "{}")])),
            ScriptedTransport::default(),
        );

        let err = exec
            .run("h", &Scope::Single("Missing".to_string()), &vars())
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::StepNotFound(ref name) if name == "Missing"));
        assert_eq!(exec.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_result_count_matches_executable_steps() {
        let steps = vec![
            step("Login", "{}"),
            step("A", "{}"),
            json!({"name": "Folder"}),
            step("B", "not json"),
            step("Login", "{}"),
            step("C", "{}"),
        ];
        let expected = steps
            .iter()
            .filter(|s| s.pointer("/request/body/raw").is_some() && s["name"] != "Login")
            .count();

        let exec = executor(
            MemoryStore::with(collection(steps)),
            ScriptedTransport::default(),
        );
        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results.len(), expected);
    }

    // -----------------------------------------------------------------------
    // Step-level failures
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_invalid_json_after_substitution_is_recorded_and_run_continues() {
        let exec = executor(
            MemoryStore::with(collection(vec![
                step("Broken", r#"{"adom": $(adom)}"#),
                step("Fine", r#"{"adom": "$(adom)"}"#),
            ])),
            ScriptedTransport::default(),
        );

        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, StepStatus::Error);
        assert_eq!(results[0].message, "Invalid JSON body after substitution");
        assert!(results[0].response.is_none());
        assert_eq!(results[1].status, StepStatus::Success);
        assert_eq!(exec.transport().call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded_without_response() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}"), step("B", "{}")])),
            ScriptedTransport::new(vec![Err(TransportError::Request(
                "error sending request: connection refused".to_string(),
            ))]),
        );

        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results[0].status, StepStatus::Error);
        assert_eq!(results[0].message, "error sending request: connection refused");
        assert!(results[0].response.is_none());
        assert_eq!(results[1].status, StepStatus::Success);
    }

    #[tokio::test]
    async fn test_device_error_keeps_response() {
        let body = json!({"result": [{"status": {"code": -5, "message": "no permission"}}]});
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}")])),
            ScriptedTransport::new(vec![reply(body.clone())]),
        );

        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results[0].status, StepStatus::Error);
        assert_eq!(results[0].message, "FMG Error (-5): no permission");
        assert_eq!(results[0].response, Some(body));
    }

    #[tokio::test]
    async fn test_unrecognised_reply_shape() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}")])),
            ScriptedTransport::new(vec![reply(json!({"foo": "bar"}))]),
        );

        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results[0].status, StepStatus::Error);
        assert_eq!(results[0].message, "Invalid FMG response format");
        assert_eq!(results[0].response, Some(json!({"foo": "bar"})));
    }

    #[tokio::test]
    async fn test_success_message_comes_from_device() {
        let exec = executor(
            MemoryStore::with(collection(vec![step("A", "{}")])),
            ScriptedTransport::new(vec![reply(
                json!({"result": [{"status": {"code": 0, "message": "OK"}}]}),
            )]),
        );

        let results = exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(results[0].status, StepStatus::Success);
        assert_eq!(results[0].message, "OK");
    }

    #[tokio::test]
    async fn test_session_token_substituted_into_body() {
        let exec = executor(
            MemoryStore::with(collection(vec![step(
                "A",
                r#"{"session": "$(session)", "method": "add"}"#,
            )])),
            ScriptedTransport::default(),
        );

        exec.run("h", &Scope::All, &vars()).await.unwrap();

        assert_eq!(
            exec.transport().payloads()[0],
            json!({"session": "tok", "method": "add"})
        );
    }

    // -----------------------------------------------------------------------
    // Run-level failures
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_unreadable_collection_aborts_run() {
        let exec = executor(MemoryStore::unreadable(), ScriptedTransport::default());

        let err = exec.run("h", &Scope::All, &vars()).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Collection(StoreError::Io(_))));
        assert_eq!(exec.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_collection_aborts_run() {
        let exec = executor(
            MemoryStore::with(json!({"item": [{"request": {}}]})),
            ScriptedTransport::default(),
        );

        let err = exec.run("h", &Scope::All, &vars()).await.unwrap_err();

        assert!(matches!(err, ProvisionError::InvalidCollection(_)));
    }

    #[test]
    fn test_select_steps_all_keeps_everything() {
        let parsed =
            Collection::from_document(collection(vec![step("A", "{}"), json!({"name": "B"})]))
                .unwrap();
        assert_eq!(select_steps(&parsed, &Scope::All).unwrap().len(), 2);
    }
}
