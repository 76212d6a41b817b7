use crate::error::LookupError;
use crate::model::AppInstance;
use appnest_store::{KindClient, StoreClient, StoreError, StoredObject};

/// Client for the `AppInstance` store.
#[derive(Clone)]
pub struct AppInstanceClient {
    inner: StoreClient<AppInstance>,
}

impl AppInstanceClient {
    pub fn new(inner: StoreClient<AppInstance>) -> Self {
        Self { inner }
    }
}

impl KindClient<AppInstance> for AppInstanceClient {
    type Error = LookupError;

    fn inner(&self) -> &StoreClient<AppInstance> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        LookupError {
            kind: AppInstance::KIND,
            source: e,
        }
    }
}
