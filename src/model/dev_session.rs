//! Development sessions.
//!
//! A dev session with the same namespace and name as a derived child means a developer
//! is driving that workload by hand; its existence is all the derivation engine checks.

use crate::model::instance::{AppInstanceSpec, ObjectMeta};
use appnest_store::{ObjectKey, StoredObject};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevSessionSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_override: Option<AppInstanceSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevSessionInstance {
    pub metadata: ObjectMeta,
    pub spec: DevSessionSpec,
}

impl DevSessionInstance {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec: DevSessionSpec::default(),
        }
    }
}

impl StoredObject for DevSessionInstance {
    const KIND: &'static str = "DevSessionInstance";
    type Error = Infallible;

    fn key(&self) -> ObjectKey {
        self.metadata.key()
    }
}
