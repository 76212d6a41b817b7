//! The application instance: both the parent being reconciled and every derived child.

use crate::model::bindings::{
    NameValue, Permissions, PortBinding, ScopedLabel, SecretBinding, ServiceBinding,
    VolumeBinding,
};
use crate::model::declaration::{Acorn, ComputeClassMap, MemoryMap, Service};
use appnest_store::{ObjectKey, StoredObject};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub generation: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppInstanceSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    pub image: String,
    pub labels: Vec<ScopedLabel>,
    pub annotations: Vec<ScopedLabel>,
    pub volumes: Vec<VolumeBinding>,
    pub secrets: Vec<SecretBinding>,
    pub links: Vec<ServiceBinding>,
    pub profiles: Vec<String>,
    pub deploy_args: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publish_mode: String,
    pub publish: Vec<PortBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<bool>,
    pub environment: Vec<NameValue>,
    pub granted_permissions: Vec<Permissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auto_upgrade_interval: String,
    pub compute_classes: ComputeClassMap,
    pub memory: MemoryMap,
}

/// The parent's app definition after its image was resolved and parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSpec {
    pub acorns: BTreeMap<String, Acorn>,
    pub services: BTreeMap<String, Service>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppStatus {
    pub acorns: BTreeMap<String, ChildStatus>,
    pub services: BTreeMap<String, ChildStatus>,
}

/// The image the parent itself was resolved to; its repository is the tag context for children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppImage {
    pub id: String,
    pub name: String,
    pub digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppInstanceStatus {
    pub app_image: AppImage,
    pub app_spec: AppSpec,
    pub app_status: AppStatus,
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppInstance {
    pub metadata: ObjectMeta,
    pub spec: AppInstanceSpec,
    #[serde(skip_serializing_if = "is_empty_status")]
    pub status: AppInstanceStatus,
}

fn is_empty_status(status: &AppInstanceStatus) -> bool {
    *status == AppInstanceStatus::default()
}

impl AppInstance {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn is_stopped(&self) -> bool {
        self.spec.stop.unwrap_or(false)
    }

    /// The explicit region, falling back to the defaulted one.
    pub fn region(&self) -> &str {
        if self.spec.region.is_empty() {
            &self.status.defaults.region
        } else {
            &self.spec.region
        }
    }

    /// A name bound to an external service via the parent's links is not derived.
    pub fn is_linked(&self, name: &str) -> bool {
        self.spec.links.iter().any(|link| link.target == name)
    }

    pub fn has_finalizer(&self, finalizer: &str) -> bool {
        self.metadata.finalizers.iter().any(|f| f == finalizer)
    }
}

#[async_trait]
impl StoredObject for AppInstance {
    const KIND: &'static str = "AppInstance";
    type Error = Infallible;

    fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    /// Generation starts at 1 and moves only when the spec changes.
    async fn on_put(&mut self, previous: Option<&Self>) -> Result<(), Self::Error> {
        self.metadata.generation = match previous {
            Some(prev) if prev.spec == self.spec => prev.metadata.generation,
            Some(prev) => prev.metadata.generation + 1,
            None => self.metadata.generation.max(1),
        };
        Ok(())
    }
}
