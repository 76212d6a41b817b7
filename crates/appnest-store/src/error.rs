//! # Store Errors
//!
//! Errors shared by every store and client. A missing object is not one of them:
//! `get` reports absence as `Ok(None)`.

/// Errors that can occur within the object store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Object error: {0}")]
    ObjectError(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// `true` for errors that say nothing about the object and are worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::StoreClosed | StoreError::StoreDropped)
    }
}
