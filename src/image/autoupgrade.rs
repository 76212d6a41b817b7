//! Auto-upgrade classification.

use crate::model::AppInstanceSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoUpgradeMode {
    /// New matching images are deployed as they appear.
    Enabled,
    /// New matching images are only reported.
    Notify,
}

/// The tag of `image` when it is an auto-upgrade pattern (contains `#` or `*`).
///
/// `ghcr.io/acme/app:v1.#.#` yields `Some("v1.#.#")`. A `:` in the registry port is
/// never mistaken for a tag separator.
pub fn pattern(image: &str) -> Option<&str> {
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    let (_, tag) = last_segment.rsplit_once(':')?;
    if tag.contains('#') || tag.contains('*') {
        Some(tag)
    } else {
        None
    }
}

/// Whether `spec` has auto-upgrade in effect, and in which mode.
pub fn auto_upgrade_mode(spec: &AppInstanceSpec) -> Option<AutoUpgradeMode> {
    if spec.notify_upgrade == Some(true) {
        Some(AutoUpgradeMode::Notify)
    } else if spec.auto_upgrade == Some(true) || pattern(&spec.image).is_some() {
        Some(AutoUpgradeMode::Enabled)
    } else {
        None
    }
}
