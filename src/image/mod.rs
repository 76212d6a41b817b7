//! # Image Reference Resolver
//!
//! Decides which image a child runs and which image its pull credential is looked up for.
//!
//! Rules, first match wins:
//!
//! 1. An auto-upgrade pattern (`repo:v1.#`) is kept as-is; resolution is left to the
//!    auto-upgrade controller. The credential is looked up for the pattern without its tag.
//! 2. A `sha256:` digest loses its prefix and is used directly.
//! 3. Anything else goes through [`resolve_tag`] against the parent's own image.

pub mod autoupgrade;
pub mod pull_secrets;
pub mod reference;

pub use autoupgrade::{auto_upgrade_mode, pattern, AutoUpgradeMode};
pub use pull_secrets::{PullSecretAssociation, PullSecrets};
pub use reference::{is_image_id, registry_for, ImageReference};

use crate::error::DeriveError;
use crate::model::AppInstance;

const DIGEST_PREFIX: &str = "sha256:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// What goes into the child's `spec.image`.
    pub image: String,
    pub is_pattern: bool,
    /// What the pull-secret association is recorded for.
    pub pull_secret_image: String,
}

pub fn resolve_image(declared: &str, parent_tag: Option<&ImageReference>) -> ResolvedImage {
    if let Some(tag) = pattern(declared) {
        let base = declared
            .strip_suffix(&format!(":{tag}"))
            .unwrap_or(declared);
        return ResolvedImage {
            image: declared.to_string(),
            is_pattern: true,
            pull_secret_image: base.to_string(),
        };
    }

    let image = match declared.strip_prefix(DIGEST_PREFIX) {
        Some(digest) => digest.to_string(),
        None => resolve_tag(parent_tag, declared),
    };
    ResolvedImage {
        pull_secret_image: image.clone(),
        image,
        is_pattern: false,
    }
}

/// A bare image id built alongside the parent lives in the parent's repository, so it is
/// pinned there by digest. Every other reference is returned unchanged.
pub fn resolve_tag(parent_tag: Option<&ImageReference>, image: &str) -> String {
    match parent_tag {
        Some(parent) if is_image_id(image) => parent
            .with_digest(format!("{DIGEST_PREFIX}{image}"))
            .to_string(),
        _ => image.to_string(),
    }
}

/// The parent's resolved image, if it has one, as the tag context for its children.
pub fn tag_context(app: &AppInstance) -> Result<Option<ImageReference>, DeriveError> {
    let name = &app.status.app_image.name;
    if name.is_empty() {
        return Ok(None);
    }
    ImageReference::parse(name)
        .map(Some)
        .map_err(|source| DeriveError::InvalidParentImage {
            image: name.clone(),
            source,
        })
}
