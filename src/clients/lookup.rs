//! The lookups derivation makes while composing service children.

use crate::clients::{AppInstanceClient, DevSessionClient};
use crate::error::LookupError;
use crate::model::{AppInstance, DevSessionInstance};
use appnest_store::{KindClient, ObjectKey};
use async_trait::async_trait;

/// Answers "does an override exist for this child?". Absence is `Ok(None)`.
#[async_trait]
pub trait OverrideLookup: Send + Sync {
    async fn dev_session(&self, key: &ObjectKey)
        -> Result<Option<DevSessionInstance>, LookupError>;

    async fn app_instance(&self, key: &ObjectKey) -> Result<Option<AppInstance>, LookupError>;
}

/// Lookups backed by the object stores.
#[derive(Clone)]
pub struct StoreLookup {
    dev_sessions: DevSessionClient,
    app_instances: AppInstanceClient,
}

impl StoreLookup {
    pub fn new(dev_sessions: DevSessionClient, app_instances: AppInstanceClient) -> Self {
        Self {
            dev_sessions,
            app_instances,
        }
    }
}

#[async_trait]
impl OverrideLookup for StoreLookup {
    async fn dev_session(
        &self,
        key: &ObjectKey,
    ) -> Result<Option<DevSessionInstance>, LookupError> {
        self.dev_sessions.get(key.clone()).await
    }

    async fn app_instance(&self, key: &ObjectKey) -> Result<Option<AppInstance>, LookupError> {
        self.app_instances.get(key.clone()).await
    }
}

/// For callers without a store: nothing is ever overridden.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

#[async_trait]
impl OverrideLookup for NoOverrides {
    async fn dev_session(
        &self,
        _key: &ObjectKey,
    ) -> Result<Option<DevSessionInstance>, LookupError> {
        Ok(None)
    }

    async fn app_instance(&self, _key: &ObjectKey) -> Result<Option<AppInstance>, LookupError> {
        Ok(None)
    }
}
