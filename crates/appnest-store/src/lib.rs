//! # Object Store
//!
//! An in-memory, actor-backed object store used by the derivation engine to
//! answer "does this object exist?" questions during a reconciliation pass.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Object Layer** ([`StoredObject`]) - the kinds that can be stored (apps, dev sessions, ...)
//! 2. **Runtime Layer** ([`ObjectStore`]) - one Tokio task per kind, owning a `BTreeMap` of objects
//! 3. **Interface Layer** ([`StoreClient`], [`KindClient`]) - cheap, cloneable, type-safe handles
//!
//! Each store processes its requests sequentially, so the object map needs no locks.
//! Many stores (one per kind) run in parallel.
//!
//! ## Lookup Semantics
//!
//! A `get` for a key that does not exist is **not** an error: it resolves to `Ok(None)`.
//! Callers that need to distinguish "absent" from "the store failed" match on the
//! `Result` first and on the `Option` second:
//!
//! ```rust
//! use appnest_store::{ObjectKey, ObjectStore, StoredObject};
//!
//! #[derive(Clone, Debug)]
//! struct Widget { namespace: String, name: String }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("widget error")]
//! struct WidgetError;
//!
//! impl StoredObject for Widget {
//!     const KIND: &'static str = "Widget";
//!     type Error = WidgetError;
//!     fn key(&self) -> ObjectKey { ObjectKey::new(&self.namespace, &self.name) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (store, client) = ObjectStore::<Widget>::new(10);
//!     tokio::spawn(store.run());
//!
//!     client.put(Widget { namespace: "ns".into(), name: "a".into() }).await.unwrap();
//!     assert!(client.get(ObjectKey::new("ns", "a")).await.unwrap().is_some());
//!     assert!(client.get(ObjectKey::new("ns", "b")).await.unwrap().is_none());
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockStore`] speaks the same channel protocol as a real store but answers from a
//! queue of expectations, which makes it easy to inject store failures.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod key;
pub mod message;
pub mod mock;
pub mod object;

pub use actor::ObjectStore;
pub use client::StoreClient;
pub use client_trait::KindClient;
pub use error::StoreError;
pub use key::ObjectKey;
pub use message::{Response, StoreRequest};
pub use object::StoredObject;
