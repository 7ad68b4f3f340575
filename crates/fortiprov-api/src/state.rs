//! Application state wiring the executor to its concrete adapters.
//!
//! The executor is generic over the store/transport ports; AppState pins it
//! to the file store and the reqwest transport.

use std::sync::Arc;
use std::time::Duration;

use fortiprov_core::executor::ProvisioningExecutor;
use fortiprov_infra::collection::FileCollectionStore;
use fortiprov_infra::rpc::ReqwestTransport;
use fortiprov_types::config::ServiceConfig;

/// Executor pinned to the infra implementations.
pub type ConcreteExecutor = ProvisioningExecutor<FileCollectionStore, ReqwestTransport>;

/// Shared application state.
///
/// Used by both CLI commands and HTTP handlers. Holds no per-run data.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ConcreteExecutor>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Build the adapters described by `config` and wire the executor.
    pub fn from_config(config: ServiceConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.device.accept_invalid_certs)?;
        let store = FileCollectionStore::new(&config.collection.path);
        let executor = ProvisioningExecutor::new(store, transport)
            .with_step_timeout(Duration::from_secs(config.device.provision_timeout_secs));

        tracing::debug!(
            collection = %config.collection.path,
            step_timeout_secs = config.device.provision_timeout_secs,
            "application state initialized"
        );

        Ok(Self {
            executor: Arc::new(executor),
            config: Arc::new(config),
        })
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.config.device.login_timeout_secs)
    }
}
