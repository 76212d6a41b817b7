//! Two-part scoping keys.
//!
//! Parent-level collections address a child by prefixing an entry's key with the child's
//! name: `worker.db` is the entry `db` as seen from inside child `worker`. This module is
//! the only place that splits or joins those strings.

use crate::error::DeriveError;

/// An entry key split into the child it addresses (if any) and the key inside that child.
///
/// The split happens at the first `.`, so `a.b.c` is entry `b.c` of child `a`; the
/// remainder is scoped again when `a` derives its own children.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopedKey {
    pub owner: Option<String>,
    pub local: String,
}

/// How a [`ScopedKey`] relates to one particular child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope<'a> {
    /// No owner. Carries the whole key.
    Unscoped(&'a str),
    /// Owned by the child in question. Carries the local key.
    Own(&'a str),
    /// Owned by some other child.
    Foreign,
}

impl ScopedKey {
    pub fn unscoped(local: impl Into<String>) -> Self {
        Self {
            owner: None,
            local: local.into(),
        }
    }

    pub fn owned(owner: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            local: local.into(),
        }
    }

    /// Parses `child.local` or a bare `local`. The empty key is the unscoped default.
    pub fn parse(raw: &str) -> Result<Self, DeriveError> {
        match raw.split_once('.') {
            None => Ok(Self::unscoped(raw)),
            Some(("", _)) => Err(malformed(raw, "empty child name before '.'")),
            Some((_, "")) => Err(malformed(raw, "empty key after '.'")),
            Some((owner, local)) => Ok(Self::owned(owner, local)),
        }
    }

    pub fn scope_for(&self, child: &str) -> KeyScope<'_> {
        match &self.owner {
            None => KeyScope::Unscoped(&self.local),
            Some(owner) if owner == child => KeyScope::Own(&self.local),
            Some(_) => KeyScope::Foreign,
        }
    }
}

/// Qualifies a resource name with the public name of the app that owns it.
pub fn qualify(public_name: &str, name: &str) -> String {
    format!("{public_name}.{name}")
}

fn malformed(raw: &str, reason: &'static str) -> DeriveError {
    DeriveError::MalformedScopeKey {
        key: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_first_dot() {
        assert_eq!(ScopedKey::parse("db").unwrap(), ScopedKey::unscoped("db"));
        assert_eq!(ScopedKey::parse("").unwrap(), ScopedKey::unscoped(""));
        assert_eq!(
            ScopedKey::parse("worker.db").unwrap(),
            ScopedKey::owned("worker", "db")
        );
        assert_eq!(
            ScopedKey::parse("worker.cache.db").unwrap(),
            ScopedKey::owned("worker", "cache.db")
        );
    }

    #[test]
    fn test_parse_rejects_empty_halves() {
        for raw in [".db", "worker.", "."] {
            match ScopedKey::parse(raw) {
                Err(DeriveError::MalformedScopeKey { key, .. }) => assert_eq!(key, raw),
                other => panic!("expected malformed key for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_scope_for() {
        let own = ScopedKey::owned("worker", "db");
        assert_eq!(own.scope_for("worker"), KeyScope::Own("db"));
        assert_eq!(own.scope_for("api"), KeyScope::Foreign);
        assert_eq!(
            ScopedKey::unscoped("db").scope_for("worker"),
            KeyScope::Unscoped("db")
        );
    }
}
