//! Image reference grammar: `[registry/]repository[:tag][@digest]`.

use crate::error::ImageReferenceError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const DEFAULT_REGISTRY: &str = "index.docker.io";
const OFFICIAL_REPO_PREFIX: &str = "library/";

fn repository_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*$")
            .expect("repository regex must compile")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w[\w.-]{0,127}$").expect("tag regex must compile"))
}

fn digest_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^sha256:[a-f0-9]{64}$").expect("digest regex must compile"))
}

fn image_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-f0-9]{64}$").expect("image id regex must compile"))
}

/// `true` for a bare 64-character image id, which names an image but no registry.
pub fn is_image_id(image: &str) -> bool {
    image_id_re().is_match(image)
}

/// A parsed, fully-qualified image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    pub registry: String,
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    pub fn parse(raw: &str) -> Result<Self, ImageReferenceError> {
        if raw.is_empty() {
            return Err(ImageReferenceError::Empty);
        }

        let (name, digest) = match raw.split_once('@') {
            Some((name, digest)) => {
                if !digest_re().is_match(digest) {
                    return Err(ImageReferenceError::InvalidDigest(digest.to_string()));
                }
                (name, Some(digest.to_string()))
            }
            None => (raw, None),
        };

        let (registry, path) = match name.split_once('/') {
            Some((host, rest)) if looks_like_registry(host) => (host.to_string(), rest),
            _ => (DEFAULT_REGISTRY.to_string(), name),
        };

        let (path, tag) = match path.rsplit_once(':') {
            Some((path, tag)) => {
                if !tag_re().is_match(tag) {
                    return Err(ImageReferenceError::InvalidTag(tag.to_string()));
                }
                (path, Some(tag.to_string()))
            }
            None => (path, None),
        };

        if !repository_re().is_match(path) {
            return Err(ImageReferenceError::InvalidRepository(path.to_string()));
        }
        let repository = if registry == DEFAULT_REGISTRY && !path.contains('/') {
            format!("{OFFICIAL_REPO_PREFIX}{path}")
        } else {
            path.to_string()
        };

        Ok(Self {
            registry,
            repository,
            tag,
            digest,
        })
    }

    /// `registry/repository`, the part of a reference that decides which credential applies.
    pub fn context(&self) -> String {
        format!("{}/{}", self.registry, self.repository)
    }

    /// The same repository pinned to `digest`.
    pub fn with_digest(&self, digest: impl Into<String>) -> Self {
        Self {
            registry: self.registry.clone(),
            repository: self.repository.clone(),
            tag: None,
            digest: Some(digest.into()),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.context())?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

fn looks_like_registry(host: &str) -> bool {
    host.contains('.') || host.contains(':') || host == "localhost"
}

/// The registry host `image` is pulled from, or `None` for bare image ids and
/// references that do not parse.
pub fn registry_for(image: &str) -> Option<String> {
    if is_image_id(image) {
        return None;
    }
    ImageReference::parse(image).ok().map(|r| r.registry)
}
