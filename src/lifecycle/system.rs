use crate::clients::{AppInstanceClient, DevSessionClient, StoreLookup};
use crate::compose::{derive_children, Derivation};
use crate::config::EngineConfig;
use crate::error::{DeriveError, ShutdownError};
use crate::model::{AppInstance, DevSessionInstance};
use appnest_store::ObjectStore;
use tracing::{error, info};

/// Runs the object stores derivation reads from and derives children against them.
///
/// `AppSystem` is responsible for:
/// - **Lifecycle Management**: starting one store task per kind and stopping them again
/// - **Dependency Wiring**: handing the store clients to the lookups derivation uses
///
/// # Example
///
/// ```ignore
/// let system = AppSystem::new(EngineConfig::default());
/// system.app_instances.put(parent.clone()).await?;
///
/// let derivation = system.derive(&parent).await?;
///
/// system.shutdown().await?;
/// ```
pub struct AppSystem {
    /// Client for the `AppInstance` store
    pub app_instances: AppInstanceClient,

    /// Client for the `DevSessionInstance` store
    pub dev_sessions: DevSessionClient,

    config: EngineConfig,

    /// Store task handles, awaited on shutdown
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl AppSystem {
    /// Spawns both stores. Must be called inside a Tokio runtime.
    pub fn new(config: EngineConfig) -> Self {
        let (app_store, app_client) = ObjectStore::<AppInstance>::new(config.store_buffer);
        let (session_store, session_client) =
            ObjectStore::<DevSessionInstance>::new(config.store_buffer);

        let app_handle = tokio::spawn(app_store.run());
        let session_handle = tokio::spawn(session_store.run());

        Self {
            app_instances: AppInstanceClient::new(app_client),
            dev_sessions: DevSessionClient::new(session_client),
            config,
            handles: vec![app_handle, session_handle],
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Override lookups backed by this system's stores.
    pub fn lookup(&self) -> StoreLookup {
        StoreLookup::new(self.dev_sessions.clone(), self.app_instances.clone())
    }

    /// One derivation pass for `parent`.
    pub async fn derive(&self, parent: &AppInstance) -> Result<Derivation, DeriveError> {
        derive_children(parent, &self.lookup(), &self.config).await
    }

    /// Drops the clients, which closes the store channels, then waits for every store
    /// task to drain and exit.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down system...");

        drop(self.app_instances);
        drop(self.dev_sessions);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
