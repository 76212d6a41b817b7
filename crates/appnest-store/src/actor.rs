//! # Generic Store Server
//!
//! `ObjectStore<T>` is the server side of a store: it owns the objects of one kind and
//! processes requests one at a time inside a single Tokio task.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::message::StoreRequest;
use crate::object::StoredObject;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic store that holds every object of kind `T`.
///
/// **Concurrency Model**:
/// Each store processes its own messages *sequentially*, so the object map needs no
/// `Mutex`. Objects are kept in a `BTreeMap` so `list` is always returned in key order.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ObjectStore::new()` returns the store (server) and a client.
/// 2.  **Run**: spawn `store.run()` in a background task.
/// 3.  **Use**: clone the client wherever lookups are needed.
///
/// The store stops when every client has been dropped.
pub struct ObjectStore<T: StoredObject> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    objects: BTreeMap<ObjectKey, T>,
}

impl<T: StoredObject> ObjectStore<T> {
    /// Creates a new `ObjectStore` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; clients wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            objects: BTreeMap::new(),
        };
        (store, StoreClient::new(sender))
    }

    /// Runs the store's event loop until the channel closes.
    pub async fn run(mut self) {
        let kind = T::KIND;
        info!(kind, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Put {
                    mut object,
                    respond_to,
                } => {
                    let key = object.key();
                    if !key.is_valid() {
                        warn!(kind, %key, "Put rejected");
                        let _ = respond_to.send(Err(StoreError::InvalidKey(key.to_string())));
                        continue;
                    }
                    if let Err(e) = object.on_put(self.objects.get(&key)).await {
                        warn!(kind, %key, error = %e, "on_put failed");
                        let _ = respond_to.send(Err(StoreError::ObjectError(Box::new(e))));
                        continue;
                    }
                    let previous = self.objects.insert(key.clone(), object);
                    info!(kind, %key, replaced = previous.is_some(), size = self.objects.len(), "Put");
                    let _ = respond_to.send(Ok(previous));
                }
                StoreRequest::Get { key, respond_to } => {
                    let object = self.objects.get(&key).cloned();
                    debug!(kind, %key, found = object.is_some(), "Get");
                    let _ = respond_to.send(Ok(object));
                }
                StoreRequest::Delete { key, respond_to } => {
                    debug!(kind, %key, "Delete");
                    let Some(object) = self.objects.get(&key) else {
                        warn!(kind, %key, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(key.to_string())));
                        continue;
                    };
                    if let Err(e) = object.on_delete().await {
                        warn!(kind, %key, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(StoreError::ObjectError(Box::new(e))));
                        continue;
                    }
                    let removed = self.objects.remove(&key);
                    info!(kind, %key, size = self.objects.len(), "Deleted");
                    let result = removed.ok_or_else(|| StoreError::NotFound(key.to_string()));
                    let _ = respond_to.send(result);
                }
                StoreRequest::List {
                    namespace,
                    respond_to,
                } => {
                    let objects: Vec<T> = self
                        .objects
                        .iter()
                        .filter(|(key, _)| {
                            namespace.as_ref().map_or(true, |ns| &key.namespace == ns)
                        })
                        .map(|(_, object)| object.clone())
                        .collect();
                    debug!(kind, ?namespace, count = objects.len(), "List");
                    let _ = respond_to.send(Ok(objects));
                }
            }
        }

        info!(kind, size = self.objects.len(), "Shutdown");
    }
}
