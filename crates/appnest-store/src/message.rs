//! # Store Messages
//!
//! The request type exchanged between a [`StoreClient`](crate::StoreClient) and its
//! [`ObjectStore`](crate::ObjectStore).

use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::object::StoredObject;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by stores.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Internal message sent to a store.
///
/// - **Put**: insert or replace; replies with the replaced object.
/// - **Get**: point lookup; `None` when absent.
/// - **Delete**: removes and replies with the removed object; `NotFound` when absent.
/// - **List**: every object, optionally restricted to one namespace, in key order.
#[derive(Debug)]
pub enum StoreRequest<T: StoredObject> {
    Put {
        object: T,
        respond_to: Response<Option<T>>,
    },
    Get {
        key: ObjectKey,
        respond_to: Response<Option<T>>,
    },
    Delete {
        key: ObjectKey,
        respond_to: Response<T>,
    },
    List {
        namespace: Option<String>,
        respond_to: Response<Vec<T>>,
    },
}
