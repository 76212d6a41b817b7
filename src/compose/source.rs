//! The closed set of shapes a child can be declared in.

use crate::model::{Acorn, AppInstance, AppStatus};

/// One child to derive, resolved from the parent's app spec.
///
/// Both variants carry the same [`Acorn`] shape so the rest of the composer never
/// branches on where a child came from, except for the service-only override lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSource {
    /// A nested app declared under `acorns`.
    Workload { name: String, acorn: Acorn },
    /// An image-backed service, translated into the equivalent nested app.
    ServiceImage { name: String, acorn: Acorn },
}

impl ChildSource {
    pub fn name(&self) -> &str {
        match self {
            ChildSource::Workload { name, .. } | ChildSource::ServiceImage { name, .. } => name,
        }
    }

    pub fn acorn(&self) -> &Acorn {
        match self {
            ChildSource::Workload { acorn, .. } | ChildSource::ServiceImage { acorn, .. } => acorn,
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, ChildSource::ServiceImage { .. })
    }

    /// The config hash the parent's status recorded for this child, if any.
    pub fn recorded_config_hash<'a>(&self, status: &'a AppStatus) -> Option<&'a str> {
        let entries = match self {
            ChildSource::Workload { .. } => &status.acorns,
            ChildSource::ServiceImage { .. } => &status.services,
        };
        entries
            .get(self.name())
            .map(|child| child.config_hash.as_str())
            .filter(|hash| !hash.is_empty())
    }
}

/// Acorns in name order, then image-backed services in name order. Names bound by the
/// parent's links are left out, as are services without an image.
pub fn collect_sources(parent: &AppInstance) -> Vec<ChildSource> {
    let app_spec = &parent.status.app_spec;

    let workloads = app_spec
        .acorns
        .iter()
        .filter(|(name, _)| !parent.is_linked(name))
        .map(|(name, acorn)| ChildSource::Workload {
            name: name.clone(),
            acorn: acorn.clone(),
        });

    let services = app_spec
        .services
        .iter()
        .filter(|(name, service)| !parent.is_linked(name) && !service.image.is_empty())
        .map(|(name, service)| ChildSource::ServiceImage {
            name: name.clone(),
            acorn: service.to_acorn(),
        });

    workloads.chain(services).collect()
}
