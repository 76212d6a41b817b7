use crate::image::reference::registry_for;
use serde::Serialize;
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// The image a child pulls and the registry whose credential applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullSecretAssociation {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
}

/// Pull-secret associations per child name, produced by one derivation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PullSecrets {
    by_child: BTreeMap<String, PullSecretAssociation>,
}

impl PullSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_child(&mut self, child: impl Into<String>, image: impl Into<String>) {
        let image = image.into();
        let registry = registry_for(&image);
        self.by_child
            .insert(child.into(), PullSecretAssociation { image, registry });
    }

    pub fn get(&self, child: &str) -> Option<&PullSecretAssociation> {
        self.by_child.get(child)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PullSecretAssociation> {
        self.by_child.iter()
    }

    pub fn len(&self) -> usize {
        self.by_child.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_child.is_empty()
    }

    /// Every registry some child needs a credential for.
    pub fn registries(&self) -> BTreeSet<&str> {
        self.by_child
            .values()
            .filter_map(|assoc| assoc.registry.as_deref())
            .collect()
    }
}
