use crate::error::LookupError;
use crate::model::DevSessionInstance;
use appnest_store::{KindClient, StoreClient, StoreError, StoredObject};

/// Client for the `DevSessionInstance` store.
#[derive(Clone)]
pub struct DevSessionClient {
    inner: StoreClient<DevSessionInstance>,
}

impl DevSessionClient {
    pub fn new(inner: StoreClient<DevSessionInstance>) -> Self {
        Self { inner }
    }
}

impl KindClient<DevSessionInstance> for DevSessionClient {
    type Error = LookupError;

    fn inner(&self) -> &StoreClient<DevSessionInstance> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        LookupError {
            kind: DevSessionInstance::KIND,
            source: e,
        }
    }
}
