//! # Generic Client
//!
//! The client half of a store.

use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::message::StoreRequest;
use crate::object::StoredObject;
use tokio::sync::{mpsc, oneshot};

/// A type-safe, cloneable handle to an `ObjectStore<T>`.
///
/// Holds only the request sender, so cloning is cheap. Every call sends one request and
/// awaits the reply on a oneshot channel.
#[derive(Clone)]
pub struct StoreClient<T: StoredObject> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoredObject> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn put(&self, object: T) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Put { object, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn get(&self, key: ObjectKey) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Get { key, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn delete(&self, key: ObjectKey) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { key, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn list(&self, namespace: Option<String>) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::List {
                namespace,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }
}
