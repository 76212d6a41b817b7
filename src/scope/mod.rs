//! # Scope Resolver
//!
//! Maps the parent's collections onto one child. Every resolver takes the parent-level
//! (global) collection, the child's own declared collection and the child's name.
//!
//! Two directions exist:
//!
//! - **Secrets and links** name resources *outside* the child. Every binding the child
//!   receives has its resource qualified with the parent's public name so it still
//!   resolves from the parent's namespace: the child's own bindings first, then the
//!   parent's unprefixed bindings as defaults, then the parent's `child.X` bindings.
//! - **Compute classes, memory, environment and permissions** configure the child itself.
//!   Parent entries addressed to `child.X` are forwarded as `X`; entries addressed to a
//!   sibling are dropped.
//!
//! Every resolver writes in two explicit phases, defaults then overrides (for maps,
//! [`write_defaults`] then [`write_overrides`]). A later write replaces an earlier entry
//! for the same key in place, which makes re-resolving an already resolved map or
//! environment a no-op.

pub mod key;

pub use key::{qualify, KeyScope, ScopedKey};

use crate::error::DeriveError;
use crate::model::{
    ComputeClassMap, MemoryMap, NameValue, Permissions, SecretBinding, ServiceBinding,
};
use std::collections::BTreeMap;

/// Map key holding the value that applies to every workload without its own entry.
pub const DEFAULT_KEY: &str = "";

/// A binding of some resource to a name the app refers to it by.
trait Binding: Sized {
    fn resource(&self) -> &str;
    fn target(&self) -> &str;
    fn rebind(resource: String, target: String) -> Self;
}

impl Binding for SecretBinding {
    fn resource(&self) -> &str {
        &self.secret
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn rebind(secret: String, target: String) -> Self {
        SecretBinding { secret, target }
    }
}

impl Binding for ServiceBinding {
    fn resource(&self) -> &str {
        &self.service
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn rebind(service: String, target: String) -> Self {
        ServiceBinding { service, target }
    }
}

pub fn scope_secrets(
    public_name: &str,
    global: &[SecretBinding],
    local: &[SecretBinding],
    child: &str,
) -> Result<Vec<SecretBinding>, DeriveError> {
    scope_bindings(public_name, global, local, child)
}

pub fn scope_links(
    public_name: &str,
    global: &[ServiceBinding],
    local: &[ServiceBinding],
    child: &str,
) -> Result<Vec<ServiceBinding>, DeriveError> {
    scope_bindings(public_name, global, local, child)
}

fn scope_bindings<B: Binding>(
    public_name: &str,
    global: &[B],
    local: &[B],
    child: &str,
) -> Result<Vec<B>, DeriveError> {
    let forward = |binding: &B, target: &str| {
        B::rebind(
            qualify(public_name, binding.resource()),
            target.to_string(),
        )
    };

    let mut result: Vec<B> = Vec::new();
    for binding in local {
        upsert(&mut result, forward(binding, binding.target()), B::target);
    }

    let mut overrides = Vec::new();
    for binding in global {
        match ScopedKey::parse(binding.target())?.scope_for(child) {
            KeyScope::Unscoped(target) => {
                upsert(&mut result, forward(binding, target), B::target)
            }
            KeyScope::Own(target) => overrides.push(forward(binding, target)),
            KeyScope::Foreign => {}
        }
    }
    for binding in overrides {
        upsert(&mut result, binding, B::target);
    }
    Ok(result)
}

pub fn scope_compute_classes(
    global: &ComputeClassMap,
    local: &ComputeClassMap,
    child: &str,
) -> Result<ComputeClassMap, DeriveError> {
    scope_map(global, local, child)
}

pub fn scope_memory(
    global: &MemoryMap,
    local: &MemoryMap,
    child: &str,
) -> Result<MemoryMap, DeriveError> {
    scope_map(global, local, child)
}

/// Child-declared variables, then the parent's bare names, then the parent's `child.X`
/// names as `X`. One entry per name; a later write takes over the earlier entry's slot.
pub fn scope_environment(
    global: &[NameValue],
    local: &[NameValue],
    child: &str,
) -> Result<Vec<NameValue>, DeriveError> {
    let mut result = Vec::new();
    for env in local {
        upsert(&mut result, env.clone(), name_of);
    }

    let mut overrides = Vec::new();
    for env in global {
        match ScopedKey::parse(&env.name)?.scope_for(child) {
            KeyScope::Unscoped(_) => upsert(&mut result, env.clone(), name_of),
            KeyScope::Own(name) => overrides.push(NameValue::new(name, env.value.clone())),
            KeyScope::Foreign => {}
        }
    }
    for env in overrides {
        upsert(&mut result, env, name_of);
    }
    Ok(result)
}

fn name_of(env: &NameValue) -> &str {
    &env.name
}

/// Replaces the entry with the same key in place, or appends.
fn upsert<T>(entries: &mut Vec<T>, entry: T, key: impl Fn(&T) -> &str) {
    match entries.iter().position(|existing| key(existing) == key(&entry)) {
        Some(index) => entries[index] = entry,
        None => entries.push(entry),
    }
}

/// Children declare no permissions of their own; only the parent's grants are scoped.
pub fn scope_permissions(
    global: &[Permissions],
    child: &str,
) -> Result<Vec<Permissions>, DeriveError> {
    let mut result = Vec::new();
    for perm in global {
        match ScopedKey::parse(&perm.service_name)?.scope_for(child) {
            KeyScope::Unscoped(_) => result.push(perm.clone()),
            KeyScope::Own(service_name) => result.push(Permissions {
                service_name: service_name.to_string(),
                rules: perm.rules.clone(),
            }),
            KeyScope::Foreign => {}
        }
    }
    Ok(result)
}

fn scope_map<V: Clone>(
    global: &BTreeMap<String, V>,
    local: &BTreeMap<String, V>,
    child: &str,
) -> Result<BTreeMap<String, V>, DeriveError> {
    let mut result = local.clone();
    write_defaults(&mut result, global);
    write_overrides(&mut result, global, child)?;
    Ok(result)
}

/// Phase one: the parent-wide default replaces whatever default the child declared.
pub fn write_defaults<V: Clone>(result: &mut BTreeMap<String, V>, global: &BTreeMap<String, V>) {
    if let Some(value) = global.get(DEFAULT_KEY) {
        result.insert(DEFAULT_KEY.to_string(), value.clone());
    }
}

/// Phase two: entries addressed to `child`. `child.X` lands on `X`; a bare `child` key is
/// the child's own default and beats the parent-wide one written in phase one.
pub fn write_overrides<V: Clone>(
    result: &mut BTreeMap<String, V>,
    global: &BTreeMap<String, V>,
    child: &str,
) -> Result<(), DeriveError> {
    for (raw, value) in global {
        if raw == DEFAULT_KEY {
            continue;
        }
        match ScopedKey::parse(raw)?.scope_for(child) {
            KeyScope::Own(local) => {
                result.insert(local.to_string(), value.clone());
            }
            KeyScope::Unscoped(name) if name == child => {
                result.insert(DEFAULT_KEY.to_string(), value.clone());
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PolicyRule;

    fn map(entries: &[(&str, &str)]) -> ComputeClassMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn secret(secret: &str, target: &str) -> SecretBinding {
        SecretBinding {
            secret: secret.into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_secrets_are_qualified_and_child_overrides_win() {
        let local = vec![secret("worker-db", "db"), secret("tls", "cert")];
        let global = vec![secret("prod-cert", "worker.cert"), secret("other", "api.cert")];

        let scoped = scope_secrets("web", &global, &local, "worker").unwrap();
        assert_eq!(
            scoped,
            vec![secret("web.worker-db", "db"), secret("web.prod-cert", "cert")]
        );
    }

    #[test]
    fn test_secret_example_from_two_children() {
        let global = vec![secret("db", "db"), secret("worker-db", "worker.db")];

        let worker = scope_secrets("web", &global, &[], "worker").unwrap();
        let api = scope_secrets("web", &global, &[], "api").unwrap();
        assert_eq!(worker, vec![secret("web.worker-db", "db")]);
        assert_eq!(api, vec![secret("web.db", "db")]);
    }

    #[test]
    fn test_unprefixed_global_secret_is_a_default() {
        let scoped = scope_secrets("web", &[secret("s", "db")], &[], "worker").unwrap();
        assert_eq!(scoped, vec![secret("web.s", "db")]);

        // The default replaces a child binding with the same target.
        let local = vec![secret("mine", "db"), secret("tls", "cert")];
        let scoped = scope_secrets("web", &[secret("s", "db")], &local, "worker").unwrap();
        assert_eq!(
            scoped,
            vec![secret("web.s", "db"), secret("web.tls", "cert")]
        );
    }

    #[test]
    fn test_override_wins_regardless_of_declaration_order() {
        let global = vec![secret("worker-db", "worker.db"), secret("db", "db")];
        let scoped = scope_secrets("web", &global, &[], "worker").unwrap();
        assert_eq!(scoped, vec![secret("web.worker-db", "db")]);
    }

    #[test]
    fn test_links_follow_secret_shape() {
        let link = |service: &str, target: &str| ServiceBinding {
            service: service.into(),
            target: target.into(),
        };
        let local = vec![link("cache", "redis")];
        let global = vec![link("shared-redis", "worker.redis"), link("queue", "mq")];

        let worker = scope_links("web", &global, &local, "worker").unwrap();
        assert_eq!(
            worker,
            vec![link("web.shared-redis", "redis"), link("web.queue", "mq")]
        );

        let api = scope_links("web", &global, &local, "api").unwrap();
        assert_eq!(api, vec![link("web.cache", "redis"), link("web.queue", "mq")]);
    }

    #[test]
    fn test_empty_global_returns_local_maps() {
        let local = map(&[("", "small"), ("web", "large")]);
        let scoped = scope_compute_classes(&ComputeClassMap::new(), &local, "worker").unwrap();
        assert_eq!(scoped, local);
    }

    #[test]
    fn test_default_then_override() {
        let global = map(&[("", "small"), ("worker", "large"), ("worker.job", "gpu")]);

        let scoped = scope_compute_classes(&global, &ComputeClassMap::new(), "worker").unwrap();
        assert_eq!(scoped, map(&[("", "large"), ("job", "gpu")]));

        let sibling = scope_compute_classes(&global, &ComputeClassMap::new(), "api").unwrap();
        assert_eq!(sibling, map(&[("", "small")]));
    }

    #[test]
    fn test_write_defaults_runs_before_overrides() {
        let global = map(&[("", "small"), ("worker", "large")]);
        let mut result = map(&[("", "tiny")]);

        write_defaults(&mut result, &global);
        assert_eq!(result[""], "small");
        write_overrides(&mut result, &global, "worker").unwrap();
        assert_eq!(result[""], "large");
    }

    #[test]
    fn test_map_resolution_is_a_fixed_point() {
        let global = map(&[("", "small"), ("worker", "large"), ("worker.job", "gpu")]);
        let local = map(&[("api", "medium")]);

        let once = scope_compute_classes(&global, &local, "worker").unwrap();
        let twice = scope_compute_classes(&global, &once, "worker").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_memory_uses_same_rules() {
        let global: MemoryMap = [
            ("".to_string(), Some(512)),
            ("worker.job".to_string(), Some(2048)),
            ("api.job".to_string(), None),
        ]
        .into_iter()
        .collect();

        let scoped = scope_memory(&global, &MemoryMap::new(), "worker").unwrap();
        assert_eq!(scoped.get(""), Some(&Some(512)));
        assert_eq!(scoped.get("job"), Some(&Some(2048)));
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn test_environment_isolation_between_siblings() {
        let global = vec![
            NameValue::new("LOG_LEVEL", "debug"),
            NameValue::new("a.X", "for-a"),
            NameValue::new("b.Y", "for-b"),
        ];
        let local = vec![NameValue::new("PORT", "80")];

        let a = scope_environment(&global, &local, "a").unwrap();
        assert_eq!(
            a,
            vec![
                NameValue::new("PORT", "80"),
                NameValue::new("LOG_LEVEL", "debug"),
                NameValue::new("X", "for-a"),
            ]
        );

        let b = scope_environment(&global, &[], "b").unwrap();
        assert!(b.iter().all(|env| env.value != "for-a"));
        assert!(b.contains(&NameValue::new("LOG_LEVEL", "debug")));
        assert!(b.contains(&NameValue::new("Y", "for-b")));
    }

    #[test]
    fn test_environment_resolution_is_a_fixed_point() {
        let global = vec![
            NameValue::new("LOG", "info"),
            NameValue::new("worker.Q", "jobs"),
            NameValue::new("api.Q", "web"),
        ];
        let local = vec![NameValue::new("Q", "local"), NameValue::new("PORT", "80")];

        let once = scope_environment(&global, &local, "worker").unwrap();
        assert_eq!(
            once,
            vec![
                NameValue::new("Q", "jobs"),
                NameValue::new("PORT", "80"),
                NameValue::new("LOG", "info"),
            ]
        );
        let twice = scope_environment(&global, &once, "worker").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_permission_isolation_between_siblings() {
        let rule = PolicyRule {
            verbs: vec!["get".into()],
            resources: vec!["secrets".into()],
            ..Default::default()
        };
        let global = vec![
            Permissions {
                service_name: "a.job".into(),
                rules: vec![rule.clone()],
            },
            Permissions {
                service_name: "shared".into(),
                rules: vec![],
            },
        ];

        let a = scope_permissions(&global, "a").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].service_name, "job");
        assert_eq!(a[0].rules, vec![rule]);

        let b = scope_permissions(&global, "b").unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].service_name, "shared");
    }

    #[test]
    fn test_malformed_keys_fail() {
        let env = vec![NameValue::new("worker.", "x")];
        assert!(matches!(
            scope_environment(&env, &[], "worker"),
            Err(DeriveError::MalformedScopeKey { .. })
        ));

        let classes = map(&[(".job", "gpu")]);
        assert!(scope_compute_classes(&classes, &ComputeClassMap::new(), "worker").is_err());
    }
}
