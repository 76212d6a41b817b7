//! # Child Instance Composer
//!
//! [`derive_children`] turns one parent into the full, ordered list of child instances
//! for a reconciliation pass:
//!
//! 1. Collect [`ChildSource`]s: acorns, then image-backed services, each in name order,
//!    minus names bound by the parent's links.
//! 2. Check every child's public name against the nesting limit.
//! 3. Compose each child (scoping, image, metadata).
//! 4. For service children only, consult the override lookups: an existing dev session
//!    suppresses updates, a prior instance still running destroy jobs suppresses pruning.
//!
//! Any error discards the whole pass. Nothing is written anywhere; the caller gets a
//! [`Derivation`] or an error.

pub mod child;
pub mod source;

pub use child::{config_hash, to_child, ComposedChild};
pub use source::{collect_sources, ChildSource};

use crate::clients::OverrideLookup;
use crate::config::EngineConfig;
use crate::error::{DeriveError, LookupError};
use crate::image::{tag_context, PullSecrets};
use crate::labels::{
    nesting_depth, public_name_for_child, ANNOTATION_PRUNE, ANNOTATION_UPDATE,
    DESTROY_JOB_FINALIZER,
};
use crate::model::AppInstance;
use appnest_store::ObjectKey;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// The result of one successful pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivation {
    pub children: Vec<AppInstance>,
    pub pull_secrets: PullSecrets,
}

#[instrument(skip_all, fields(app = %parent.name(), namespace = %parent.namespace()))]
pub async fn derive_children<L>(
    parent: &AppInstance,
    lookup: &L,
    config: &EngineConfig,
) -> Result<Derivation, DeriveError>
where
    L: OverrideLookup + ?Sized,
{
    let parent_tag = tag_context(parent)?;
    let sources = collect_sources(parent);

    for source in &sources {
        check_depth(parent, source.name(), config.max_nesting_depth)?;
    }

    let mut derivation = Derivation::default();
    for source in &sources {
        let ComposedChild {
            mut instance,
            pull_secret_image,
            auto_upgrade_pattern,
        } = to_child(parent, source, parent_tag.as_ref())?;

        if source.is_service() {
            apply_service_overrides(&mut instance, lookup).await?;
        }

        debug!(
            child = source.name(),
            name = %instance.metadata.name,
            image = %instance.spec.image,
            auto_upgrade = auto_upgrade_pattern,
            "Derived child"
        );
        derivation
            .pull_secrets
            .for_child(source.name(), pull_secret_image);
        derivation.children.push(instance);
    }

    info!(
        children = derivation.children.len(),
        registries = ?derivation.pull_secrets.registries(),
        "Derivation complete"
    );
    Ok(derivation)
}

fn check_depth(parent: &AppInstance, child: &str, limit: usize) -> Result<(), DeriveError> {
    let public_name = public_name_for_child(parent, child);
    if nesting_depth(&public_name) > limit {
        warn!(public_name = %public_name, limit, "Nesting limit exceeded");
        return Err(DeriveError::NestingLimitExceeded { public_name, limit });
    }
    Ok(())
}

async fn apply_service_overrides<L>(child: &mut AppInstance, lookup: &L) -> Result<(), DeriveError>
where
    L: OverrideLookup + ?Sized,
{
    let key = child.metadata.key();

    let session = lookup
        .dev_session(&key)
        .await
        .map_err(|source| lookup_failed(&key, source))?;
    if session.is_some() {
        debug!(key = %key, "Dev session found, suppressing updates");
        child
            .metadata
            .annotations
            .insert(ANNOTATION_UPDATE.to_string(), "false".to_string());
    }

    let existing = lookup
        .app_instance(&key)
        .await
        .map_err(|source| lookup_failed(&key, source))?;
    if existing.is_some_and(|app| app.has_finalizer(DESTROY_JOB_FINALIZER)) {
        debug!(key = %key, "Destroy in progress, suppressing prune");
        child
            .metadata
            .annotations
            .insert(ANNOTATION_PRUNE.to_string(), "false".to_string());
    }
    Ok(())
}

fn lookup_failed(key: &ObjectKey, source: LookupError) -> DeriveError {
    warn!(
        key = %key,
        error = %source,
        transient = source.source.is_transient(),
        "Override lookup failed"
    );
    DeriveError::Lookup {
        key: key.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::NoOverrides;
    use crate::labels::ACORN_PUBLIC_NAME;
    use crate::model::{Acorn, ServiceBinding};

    fn parent_with_public_name(public_name: &str) -> AppInstance {
        let mut app = AppInstance::new("acorn", "app");
        app.metadata
            .labels
            .insert(ACORN_PUBLIC_NAME.into(), public_name.into());
        app.status.app_spec.acorns.insert(
            "leaf".into(),
            Acorn {
                image: "acme/leaf".into(),
                ..Default::default()
            },
        );
        app
    }

    fn dotted(segments: usize) -> String {
        (1..=segments)
            .map(|i| format!("n{i}"))
            .collect::<Vec<_>>()
            .join(".")
    }

    #[tokio::test]
    async fn test_depth_limit_boundary() {
        let config = EngineConfig::default();

        // The child adds one segment to its parent's public name.
        let ten = parent_with_public_name(&dotted(9));
        let ok = derive_children(&ten, &NoOverrides, &config).await.unwrap();
        assert_eq!(
            ok.children[0].metadata.labels[ACORN_PUBLIC_NAME].split('.').count(),
            10
        );

        let eleven = parent_with_public_name(&dotted(10));
        let err = derive_children(&eleven, &NoOverrides, &config)
            .await
            .unwrap_err();
        assert!(err.is_terminal());
        assert!(matches!(
            err,
            DeriveError::NestingLimitExceeded { limit: 10, .. }
        ));
    }

    #[tokio::test]
    async fn test_linked_children_are_skipped() {
        let mut app = parent_with_public_name("app");
        app.spec.links.push(ServiceBinding {
            service: "elsewhere".into(),
            target: "leaf".into(),
        });
        let derivation = derive_children(&app, &NoOverrides, &EngineConfig::default())
            .await
            .unwrap();
        assert!(derivation.children.is_empty());
        assert!(derivation.pull_secrets.is_empty());
    }

    #[tokio::test]
    async fn test_pull_secrets_are_returned() {
        let app = parent_with_public_name("app");
        let derivation = derive_children(&app, &NoOverrides, &EngineConfig::default())
            .await
            .unwrap();
        let assoc = derivation.pull_secrets.get("leaf").unwrap();
        assert_eq!(assoc.image, "acme/leaf");
        assert_eq!(assoc.registry.as_deref(), Some("index.docker.io"));
    }
}
