//! # Label/Annotation Composer
//!
//! Well-known label and annotation keys plus the merge and filter helpers used to build a
//! child's metadata.

pub mod naming;

pub use naming::{nesting_depth, public_name, public_name_for_child, safe_hash_concat_name};

use crate::model::{AppInstance, ScopedLabel, LABEL_TYPE_ACORN, LABEL_TYPE_META};
use std::collections::BTreeMap;

pub const ACORN_MANAGED: &str = "acorn.io/managed";
pub const ACORN_APP_NAME: &str = "acorn.io/app-name";
pub const ACORN_APP_NAMESPACE: &str = "acorn.io/app-namespace";
pub const ACORN_ACORN_NAME: &str = "acorn.io/acorn-name";
pub const ACORN_PARENT_ACORN_NAME: &str = "acorn.io/parent-acorn-name";
pub const ACORN_PUBLIC_NAME: &str = "acorn.io/public-name";
pub const ACORN_APP_GENERATION: &str = "acorn.io/app-generation";
pub const ACORN_CONFIG_HASH: &str = "acorn.io/config-hash";
pub const ACORN_ORIGINAL_IMAGE: &str = "acorn.io/original-image";

/// Set to `"false"` to stop the apply framework from updating an existing object.
pub const ANNOTATION_UPDATE: &str = "apply.acorn.io/update";
/// Set to `"false"` to stop the apply framework from deleting an object.
pub const ANNOTATION_PRUNE: &str = "apply.acorn.io/prune";

/// Present on an app while its destroy jobs are still running.
pub const DESTROY_JOB_FINALIZER: &str = "jobs.acorn.io/destroy";

/// Keys under this prefix are reserved for management markers.
const RESERVED_PREFIX: &str = "acorn.io/";

pub type LabelMap = BTreeMap<String, String>;

/// Later maps win on key conflicts.
pub fn merge(base: LabelMap, overlay: LabelMap) -> LabelMap {
    let mut result = base;
    result.extend(overlay);
    result
}

/// The management markers every derived object carries, followed by `extra` pairs.
pub fn managed(app: &AppInstance, extra: &[(&str, &str)]) -> LabelMap {
    let mut labels = LabelMap::new();
    labels.insert(ACORN_MANAGED.to_string(), "true".to_string());
    labels.insert(ACORN_APP_NAME.to_string(), app.name().to_string());
    labels.insert(ACORN_APP_NAMESPACE.to_string(), app.namespace().to_string());
    for (key, value) in extra {
        labels.insert(key.to_string(), value.to_string());
    }
    labels
}

/// Collects the labels that apply to resource `name` of type `kind`: the global map,
/// then the resource's own labels, then every scoped label whose type and name either
/// match or are left empty.
pub fn gather_scoped(
    name: &str,
    kind: &str,
    global: &LabelMap,
    resource_labels: &LabelMap,
    scoped: &[ScopedLabel],
) -> LabelMap {
    let mut result = global.clone();
    result.extend(resource_labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    for label in scoped {
        let type_matches = label.resource_type.is_empty() || label.resource_type == kind;
        let name_matches = label.resource_name.is_empty() || label.resource_name == name;
        if type_matches && name_matches {
            result.insert(label.key.clone(), label.value.clone());
        }
    }
    result
}

/// Drops reserved keys so user labels cannot impersonate management markers.
pub fn exclude_acorn_keys(labels: LabelMap) -> LabelMap {
    labels
        .into_iter()
        .filter(|(key, _)| !key.contains(RESERVED_PREFIX))
        .collect()
}

/// User labels (or annotations) for child `child`: the child's own metadata-typed and
/// global entries, overlaid with the parent's app-level map and the parent's scoped
/// entries aimed at nested apps.
pub fn app_instance_scoped(
    child: &str,
    global: &LabelMap,
    parent_scoped: &[ScopedLabel],
    child_scoped: &[ScopedLabel],
) -> LabelMap {
    let own: LabelMap = child_scoped
        .iter()
        .filter(|label| {
            label.resource_type == LABEL_TYPE_META
                || (label.resource_type.is_empty() && label.resource_name.is_empty())
        })
        .map(|label| (label.key.clone(), label.value.clone()))
        .collect();

    let gathered = gather_scoped(child, LABEL_TYPE_ACORN, global, &own, parent_scoped);
    exclude_acorn_keys(merge(own, gathered))
}
