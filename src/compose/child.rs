//! Builds one derived child from its source.

use crate::compose::source::ChildSource;
use crate::error::DeriveError;
use crate::image::{auto_upgrade_mode, resolve_image, ImageReference};
use crate::labels::{
    self, app_instance_scoped, managed, merge, public_name, public_name_for_child,
    safe_hash_concat_name, LabelMap,
};
use crate::model::{Acorn, AppInstance, AppInstanceSpec, ObjectMeta};
use crate::scope;
use sha2::{Digest, Sha256};

/// A derived child plus the image its pull credential is looked up for.
#[derive(Debug, Clone)]
pub struct ComposedChild {
    pub instance: AppInstance,
    pub pull_secret_image: String,
    /// The declared image is an auto-upgrade pattern.
    pub auto_upgrade_pattern: bool,
}

pub fn to_child(
    parent: &AppInstance,
    source: &ChildSource,
    parent_tag: Option<&ImageReference>,
) -> Result<ComposedChild, DeriveError> {
    let name = source.name();
    let acorn = source.acorn();
    let parent_public = public_name(parent);
    let resolved = resolve_image(&acorn.image, parent_tag);
    let auto_upgrade_pattern = resolved.is_pattern;

    let child_public = public_name_for_child(parent, name);
    let label_map = merge(
        app_instance_scoped(
            name,
            &parent.status.app_spec.labels,
            &parent.spec.labels,
            &acorn.labels,
        ),
        managed(
            parent,
            &[
                (labels::ACORN_ACORN_NAME, name),
                (labels::ACORN_PARENT_ACORN_NAME, parent.name()),
                (labels::ACORN_PUBLIC_NAME, child_public.as_str()),
            ],
        ),
    );

    let config_hash = match source.recorded_config_hash(&parent.status.app_status) {
        Some(hash) => hash.to_string(),
        None => config_hash(acorn)?,
    };
    let mut markers = LabelMap::new();
    markers.insert(
        labels::ACORN_APP_GENERATION.to_string(),
        parent.metadata.generation.to_string(),
    );
    markers.insert(labels::ACORN_CONFIG_HASH.to_string(), config_hash);
    let annotations = merge(
        app_instance_scoped(
            name,
            &parent.status.app_spec.annotations,
            &parent.spec.annotations,
            &acorn.annotations,
        ),
        markers,
    );

    let publish_mode = if parent.spec.publish_mode.is_empty() {
        acorn.publish_mode.clone()
    } else {
        parent.spec.publish_mode.clone()
    };

    let global = &parent.spec;
    let spec = AppInstanceSpec {
        region: parent.region().to_string(),
        image: resolved.image,
        labels: [acorn.labels.as_slice(), global.labels.as_slice()].concat(),
        annotations: [acorn.annotations.as_slice(), global.annotations.as_slice()].concat(),
        volumes: acorn.volumes.clone(),
        secrets: scope::scope_secrets(parent_public, &global.secrets, &acorn.secrets, name)?,
        links: scope::scope_links(parent_public, &global.links, &acorn.links, name)?,
        profiles: acorn.profiles.clone(),
        deploy_args: acorn.deploy_args.clone(),
        publish_mode,
        publish: acorn.publish.clone(),
        stop: Some(parent.is_stopped()),
        environment: scope::scope_environment(&global.environment, &acorn.environment, name)?,
        granted_permissions: scope::scope_permissions(&global.granted_permissions, name)?,
        auto_upgrade: acorn.auto_upgrade,
        notify_upgrade: acorn.notify_upgrade,
        auto_upgrade_interval: acorn.auto_upgrade_interval.clone(),
        compute_classes: scope::scope_compute_classes(
            &global.compute_classes,
            &acorn.compute_classes,
            name,
        )?,
        memory: scope::scope_memory(&global.memory, &acorn.memory, name)?,
    };

    let mut metadata = ObjectMeta {
        labels: label_map,
        annotations,
        ..ObjectMeta::new(parent.namespace(), safe_hash_concat_name(&[parent.name(), name]))
    };
    // A concrete image here would misreport what an auto-upgrading child runs.
    if auto_upgrade_mode(&spec).is_none() {
        metadata.annotations.insert(
            labels::ACORN_ORIGINAL_IMAGE.to_string(),
            acorn.original_image().to_string(),
        );
    }

    Ok(ComposedChild {
        instance: AppInstance {
            metadata,
            spec,
            ..Default::default()
        },
        pull_secret_image: resolved.pull_secret_image,
        auto_upgrade_pattern,
    })
}

/// SHA-256 of the declaration's JSON form. Maps are ordered, so equal declarations hash
/// equally.
pub fn config_hash(acorn: &Acorn) -> Result<String, DeriveError> {
    let bytes = serde_json::to_vec(acorn)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
