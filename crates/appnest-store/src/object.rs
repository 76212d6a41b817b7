//! # StoredObject Trait
//!
//! The contract every kind (application instance, dev session, ...) implements so the
//! generic [`ObjectStore`](crate::ObjectStore) can hold it.
//!
//! # Provided Methods (Hooks)
//! - [`StoredObject::on_put`]
//! - [`StoredObject::on_delete`]
//!
//! Both default to `Ok(())`. Override them to validate an object before it is stored
//! or to refuse a delete.

use crate::key::ObjectKey;
use async_trait::async_trait;

/// Trait that any object kind must implement to be held by an `ObjectStore`.
///
/// # Async Hooks
/// The hooks are `#[async_trait]` so an implementation may await while validating.
/// Hooks run inside the store task, so a slow hook delays every request for that kind.
#[async_trait]
pub trait StoredObject: Clone + Send + Sync + 'static {
    /// Human-readable kind name, used in logs and error messages.
    const KIND: &'static str;

    /// The error type returned by the hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The `namespace/name` this object is stored under.
    fn key(&self) -> ObjectKey;

    /// Called before the object is inserted. `previous` is the object it replaces, if any.
    async fn on_put(&mut self, _previous: Option<&Self>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called immediately before the object is removed.
    async fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
