//! # Errors
//!
//! Derivation either succeeds for the whole parent or fails with one [`DeriveError`].
//! Configuration errors are terminal: nothing changes until the user edits the spec.
//! Lookup errors are transient and the caller retries the whole pass.

use appnest_store::{ObjectKey, StoreError};
use thiserror::Error;

/// A store lookup that failed for a reason other than the object being absent.
#[derive(Debug, Error)]
#[error("{kind} lookup failed: {source}")]
pub struct LookupError {
    pub kind: &'static str,
    #[source]
    pub source: StoreError,
}

#[derive(Debug, Error)]
pub enum ImageReferenceError {
    #[error("empty image reference")]
    Empty,
    #[error("invalid repository {0:?}")]
    InvalidRepository(String),
    #[error("invalid tag {0:?}")]
    InvalidTag(String),
    #[error("invalid digest {0:?}")]
    InvalidDigest(String),
}

/// Errors that abort the derivation of one parent's children.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("max limit of {limit} nested acorns exceeded: {public_name}")]
    NestingLimitExceeded { public_name: String, limit: usize },

    #[error("malformed scoping key {key:?}: {reason}")]
    MalformedScopeKey { key: String, reason: &'static str },

    #[error("parent image {image:?}: {source}")]
    InvalidParentImage {
        image: String,
        #[source]
        source: ImageReferenceError,
    },

    #[error("looking up {key}: {source}")]
    Lookup {
        key: ObjectKey,
        #[source]
        source: LookupError,
    },

    #[error("hashing child configuration: {0}")]
    ConfigHash(#[from] serde_json::Error),
}

impl DeriveError {
    /// `true` when retrying without a spec change cannot succeed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeriveError::Lookup { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A store task that panicked or was cancelled before shutdown completed.
#[derive(Debug, Error)]
#[error("store task failed: {0}")]
pub struct ShutdownError(#[from] tokio::task::JoinError);
