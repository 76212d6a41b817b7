//! Deterministic object names and dotted public names.

use crate::labels::ACORN_PUBLIC_NAME;
use crate::model::AppInstance;
use sha2::{Digest, Sha256};

const MAX_NAME_LEN: usize = 63;

/// Joins `parts` with `-`. Joins of 64 characters or more are cut and suffixed with a
/// short SHA-256 of the full join, so the result always fits in 63 characters and
/// distinct inputs stay distinct.
pub fn safe_hash_concat_name(parts: &[&str]) -> String {
    let full = parts.join("-");
    if full.len() <= MAX_NAME_LEN {
        return full;
    }

    let digest = hex::encode(Sha256::digest(full.as_bytes()));
    // The cut must not leave a trailing character a name cannot end with.
    let c = full.as_bytes()[56];
    let (mut cut, suffix) = if c.is_ascii_lowercase() || c.is_ascii_digit() {
        (57, &digest[..5])
    } else {
        (56, &digest[..6])
    };
    while !full.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}-{}", &full[..cut], suffix)
}

/// The globally addressable name of `app`: its public-name label, else its object name.
pub fn public_name(app: &AppInstance) -> &str {
    app.metadata
        .labels
        .get(ACORN_PUBLIC_NAME)
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(&app.metadata.name)
}

pub fn public_name_for_child(app: &AppInstance, child: &str) -> String {
    format!("{}.{}", public_name(app), child)
}

/// Number of `.`-separated segments, i.e. how deep in the nesting tree the name sits.
pub fn nesting_depth(public_name: &str) -> usize {
    public_name.split('.').count()
}
