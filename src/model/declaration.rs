//! Child declarations as they appear in a parent's resolved app spec.

use crate::model::bindings::{
    NameValue, PortBinding, ScopedLabel, SecretBinding, ServiceBinding, VolumeBinding,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compute class per workload; the empty key is the default for the whole app.
pub type ComputeClassMap = BTreeMap<String, String>;

/// Memory limit in bytes per workload; the empty key is the default for the whole app.
pub type MemoryMap = BTreeMap<String, Option<i64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcornBuild {
    /// The image reference the user wrote before the build replaced it with an image id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub acornfile: String,
}

/// A nested child application declared under `acorns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Acorn {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<AcornBuild>,
    pub labels: Vec<ScopedLabel>,
    pub annotations: Vec<ScopedLabel>,
    pub secrets: Vec<SecretBinding>,
    pub links: Vec<ServiceBinding>,
    pub volumes: Vec<VolumeBinding>,
    pub profiles: Vec<String>,
    pub deploy_args: serde_json::Map<String, serde_json::Value>,
    pub publish: Vec<PortBinding>,
    pub publish_mode: String,
    pub environment: Vec<NameValue>,
    pub compute_classes: ComputeClassMap,
    pub memory: MemoryMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_upgrade: Option<bool>,
    pub auto_upgrade_interval: String,
}

impl Acorn {
    /// The image as the user declared it: the pre-build reference when there was a build.
    pub fn original_image(&self) -> &str {
        match &self.build {
            Some(build) if !build.original_image.is_empty() => &build.original_image,
            _ => &self.image,
        }
    }
}

/// A service declared under `services`. Only services with an image become children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<AcornBuild>,
    pub labels: Vec<ScopedLabel>,
    pub annotations: Vec<ScopedLabel>,
    pub service_args: serde_json::Map<String, serde_json::Value>,
    pub environment: Vec<NameValue>,
    pub secrets: Vec<SecretBinding>,
    pub links: Vec<ServiceBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_upgrade: Option<bool>,
    pub auto_upgrade_interval: String,
    pub memory: MemoryMap,
    pub compute_classes: ComputeClassMap,
    /// Fixed address or container-backed service settings; never copied to a child.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
}

impl Service {
    /// The equivalent child declaration. Service-only fields (`address`) have no
    /// counterpart; `service_args` become the child's deploy args.
    pub fn to_acorn(&self) -> Acorn {
        Acorn {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            image: self.image.clone(),
            build: self.build.clone(),
            deploy_args: self.service_args.clone(),
            environment: self.environment.clone(),
            secrets: self.secrets.clone(),
            links: self.links.clone(),
            auto_upgrade: self.auto_upgrade,
            notify_upgrade: self.notify_upgrade,
            auto_upgrade_interval: self.auto_upgrade_interval.clone(),
            memory: self.memory.clone(),
            compute_classes: self.compute_classes.clone(),
            ..Default::default()
        }
    }
}
