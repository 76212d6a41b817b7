//! # Mock Store & Testing Guide
//!
//! `MockStore<T>` hands out a real [`StoreClient<T>`] whose requests are answered from a
//! queue of expectations instead of a stored object map. Use it to make a store return
//! exactly what a test needs, including failures that a real store never produces.
//!
//! ## When to use Mocks vs a Real Store
//!
//! | Feature | MockStore | ObjectStore |
//! |---------|-----------|-------------|
//! | **State** | None (expectations) | Real object map |
//! | **Ordering** | Strict, checked per request | Any |
//! | **Error Injection** | Easy (`return_err`) | Not possible for `get` |
//! | **Use Case** | Error paths, exact call sequences | Full-system tests |
//!
//! ## Simulating a Store Failure
//!
//! ```rust
//! use appnest_store::mock::MockStore;
//! use appnest_store::{ObjectKey, StoreError, StoredObject};
//!
//! #[derive(Clone, Debug)] struct Widget;
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct WidgetError;
//! impl StoredObject for Widget {
//!     const KIND: &'static str = "Widget";
//!     type Error = WidgetError;
//!     fn key(&self) -> ObjectKey { ObjectKey::new("ns", "w") }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStore::<Widget>::new();
//!     let client = mock.client();
//!
//!     mock.expect_get(ObjectKey::new("ns", "w"))
//!         .return_err(StoreError::StoreClosed);
//!
//!     let result = client.get(ObjectKey::new("ns", "w")).await;
//!     assert!(matches!(result, Err(StoreError::StoreClosed)));
//!     mock.verify();
//! }
//! ```

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::key::ObjectKey;
use crate::message::StoreRequest;
use crate::object::StoredObject;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it.
enum Expectation<T: StoredObject> {
    Get {
        key: ObjectKey,
        response: Result<Option<T>, StoreError>,
    },
    Put {
        response: Result<Option<T>, StoreError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock store with expectation tracking.
///
/// Requests must arrive in the order the expectations were registered. A request that
/// does not match the next expectation panics the mock task, which closes the channel
/// and makes the pending client call fail with [`StoreError::StoreDropped`].
pub struct MockStore<T: StoredObject> {
    client: StoreClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoredObject> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredObject> MockStore<T> {
    /// Creates a new mock store with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        StoreRequest::Get { key, respond_to },
                        Some(Expectation::Get {
                            key: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(key, expected, "{} get for unexpected key", T::KIND);
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Put {
                            object: _,
                            respond_to,
                        },
                        Some(Expectation::Put { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected {} request or expectation mismatch", T::KIND);
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    /// Expects a `get` for `key`.
    pub fn expect_get(&mut self, key: ObjectKey) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `put` of any object.
    pub fn expect_put(&mut self) -> PutExpectationBuilder<T> {
        PutExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!(
                "Not all {} expectations were met. {} remaining",
                T::KIND,
                exps.len()
            );
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: StoredObject> {
    key: ObjectKey,
    expectations: Expectations<T>,
}

impl<T: StoredObject> GetExpectationBuilder<T> {
    /// Answer with `Ok(value)`; `None` means the object does not exist.
    pub fn return_ok(self, value: Option<T>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            key: self.key,
            response: Ok(value),
        });
    }

    /// Answer with an error.
    pub fn return_err(self, error: StoreError) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            key: self.key,
            response: Err(error),
        });
    }
}

/// Builder for `put` expectations.
pub struct PutExpectationBuilder<T: StoredObject> {
    expectations: Expectations<T>,
}

impl<T: StoredObject> PutExpectationBuilder<T> {
    pub fn return_ok(self, previous: Option<T>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Put {
                response: Ok(previous),
            });
    }

    pub fn return_err(self, error: StoreError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Put {
                response: Err(error),
            });
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the raw receiver behind it, for tests that want to inspect each
/// request themselves. Consider [`MockStore`] for a more fluent API.
pub fn create_mock_client<T: StoredObject>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: StoredObject>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    ObjectKey,
    tokio::sync::oneshot::Sender<Result<Option<T>, StoreError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}
