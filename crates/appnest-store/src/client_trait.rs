//! # KindClient Trait
//!
//! Gives kind-specific clients the standard `get` / `put` / `delete` calls on top of a
//! generic [`StoreClient`], translated into the caller's own error type.
use crate::{ObjectKey, StoreClient, StoreError, StoredObject};
use async_trait::async_trait;

/// Trait for kind-specific clients to inherit the standard store operations.
///
/// # Example
///
/// ```rust
/// use appnest_store::{KindClient, ObjectKey, StoreClient, StoreError, StoredObject};
///
/// #[derive(Clone, Debug)]
/// struct Widget { name: String }
/// #[derive(Debug, thiserror::Error)]
/// #[error("widget error")]
/// struct WidgetError;
///
/// impl StoredObject for Widget {
///     const KIND: &'static str = "Widget";
///     type Error = WidgetError;
///     fn key(&self) -> ObjectKey { ObjectKey::new("default", &self.name) }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("widget lookup failed: {0}")]
/// struct LookupFailed(String);
///
/// struct WidgetClient { inner: StoreClient<Widget> }
///
/// impl KindClient<Widget> for WidgetClient {
///     type Error = LookupFailed;
///     fn inner(&self) -> &StoreClient<Widget> { &self.inner }
///     fn map_error(e: StoreError) -> Self::Error { LookupFailed(e.to_string()) }
/// }
///
/// async fn usage(client: WidgetClient) {
///     // get(), put() and delete() are provided automatically
///     let _ = client.get(ObjectKey::new("default", "w1")).await;
/// }
/// ```
#[async_trait]
pub trait KindClient<T: StoredObject>: Send + Sync {
    /// The kind-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic StoreClient.
    fn inner(&self) -> &StoreClient<T>;

    /// Map store errors to the kind-specific error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch an object by key. Absence is `Ok(None)`.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn get(&self, key: ObjectKey) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(key).await.map_err(Self::map_error)
    }

    /// Insert or replace an object, returning the one it replaced.
    #[tracing::instrument(skip(self, object), fields(kind = T::KIND))]
    async fn put(&self, object: T) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().put(object).await.map_err(Self::map_error)
    }

    /// Delete an object by key.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, key: ObjectKey) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(key).await.map_err(Self::map_error)
    }
}
