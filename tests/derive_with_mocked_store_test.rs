//! Override lookups against mocked stores, to drive the failure paths a real store
//! never takes.

use appnest::clients::{AppInstanceClient, DevSessionClient, StoreLookup};
use appnest::error::DeriveError;
use appnest::labels::{ANNOTATION_PRUNE, ANNOTATION_UPDATE, DESTROY_JOB_FINALIZER};
use appnest::model::{Acorn, AppInstance, DevSessionInstance, Service};
use appnest::{derive_children, EngineConfig};
use appnest_store::mock::MockStore;
use appnest_store::{ObjectKey, StoreError};

fn parent_with_service() -> AppInstance {
    let mut parent = AppInstance::new("acorn", "web");
    parent.status.app_spec.services.insert(
        "db".into(),
        Service {
            image: "postgres:16".into(),
            ..Default::default()
        },
    );
    parent
}

fn db_key() -> ObjectKey {
    ObjectKey::new("acorn", "web-db")
}

struct Mocks {
    sessions: MockStore<DevSessionInstance>,
    apps: MockStore<AppInstance>,
}

impl Mocks {
    fn new() -> Self {
        Self {
            sessions: MockStore::new(),
            apps: MockStore::new(),
        }
    }

    fn lookup(&self) -> StoreLookup {
        StoreLookup::new(
            DevSessionClient::new(self.sessions.client()),
            AppInstanceClient::new(self.apps.client()),
        )
    }

    fn verify(&self) {
        self.sessions.verify();
        self.apps.verify();
    }
}

#[tokio::test]
async fn test_not_found_means_no_override() {
    let mut mocks = Mocks::new();
    mocks.sessions.expect_get(db_key()).return_ok(None);
    mocks.apps.expect_get(db_key()).return_ok(None);

    let derivation = derive_children(
        &parent_with_service(),
        &mocks.lookup(),
        &EngineConfig::default(),
    )
    .await
    .expect("not-found must not fail the pass");

    let annotations = &derivation.children[0].metadata.annotations;
    assert!(!annotations.contains_key(ANNOTATION_UPDATE));
    assert!(!annotations.contains_key(ANNOTATION_PRUNE));
    mocks.verify();
}

#[tokio::test]
async fn test_dev_session_lookup_failure_aborts_pass() {
    let mut mocks = Mocks::new();
    mocks
        .sessions
        .expect_get(db_key())
        .return_err(StoreError::StoreClosed);

    let err = derive_children(
        &parent_with_service(),
        &mocks.lookup(),
        &EngineConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(!err.is_terminal());
    assert_eq!(
        err.to_string(),
        "looking up acorn/web-db: DevSessionInstance lookup failed: Store closed"
    );
    mocks.verify();
}

#[tokio::test]
async fn test_app_instance_lookup_failure_aborts_pass() {
    let mut mocks = Mocks::new();
    mocks
        .sessions
        .expect_get(db_key())
        .return_ok(Some(DevSessionInstance::new("acorn", "web-db")));
    mocks
        .apps
        .expect_get(db_key())
        .return_err(StoreError::StoreDropped);

    let err = derive_children(
        &parent_with_service(),
        &mocks.lookup(),
        &EngineConfig::default(),
    )
    .await
    .unwrap_err();

    match err {
        DeriveError::Lookup { key, source } => {
            assert_eq!(key, db_key());
            assert_eq!(source.kind, "AppInstance");
        }
        other => panic!("unexpected error: {other}"),
    }
    mocks.verify();
}

#[tokio::test]
async fn test_late_lookup_failure_discards_earlier_children() {
    let mut parent = parent_with_service();
    parent.status.app_spec.services.insert(
        "cache".into(),
        Service {
            image: "redis:7".into(),
            ..Default::default()
        },
    );
    let cache_key = ObjectKey::new("acorn", "web-cache");

    // "cache" sorts first and derives cleanly; "db" fails on its second lookup.
    let mut mocks = Mocks::new();
    mocks.sessions.expect_get(cache_key.clone()).return_ok(None);
    mocks
        .sessions
        .expect_get(db_key())
        .return_ok(Some(DevSessionInstance::new("acorn", "web-db")));
    mocks.apps.expect_get(cache_key).return_ok(None);
    mocks
        .apps
        .expect_get(db_key())
        .return_err(StoreError::StoreDropped);

    let result = derive_children(&parent, &mocks.lookup(), &EngineConfig::default()).await;

    match result {
        Err(DeriveError::Lookup { key, source }) => {
            assert_eq!(key, db_key());
            assert_eq!(source.kind, "AppInstance");
            assert!(source.source.is_transient());
        }
        other => panic!("expected the whole pass to fail, got {other:?}"),
    }
    mocks.verify();
}

#[tokio::test]
async fn test_overrides_from_mocked_objects() {
    let mut mocks = Mocks::new();
    let mut previous = AppInstance::new("acorn", "web-db");
    previous.metadata.finalizers = vec![DESTROY_JOB_FINALIZER.into()];
    mocks
        .sessions
        .expect_get(db_key())
        .return_ok(Some(DevSessionInstance::new("acorn", "web-db")));
    mocks.apps.expect_get(db_key()).return_ok(Some(previous));

    let derivation = derive_children(
        &parent_with_service(),
        &mocks.lookup(),
        &EngineConfig::default(),
    )
    .await
    .unwrap();

    let annotations = &derivation.children[0].metadata.annotations;
    assert_eq!(annotations[ANNOTATION_UPDATE], "false");
    assert_eq!(annotations[ANNOTATION_PRUNE], "false");
    mocks.verify();
}

#[tokio::test]
async fn test_workload_children_are_not_looked_up() {
    let mocks = Mocks::new();
    let mut parent = AppInstance::new("acorn", "web");
    parent.status.app_spec.acorns.insert(
        "worker".into(),
        Acorn {
            image: "acme/worker".into(),
            ..Default::default()
        },
    );

    let derivation = derive_children(&parent, &mocks.lookup(), &EngineConfig::default())
        .await
        .unwrap();
    assert_eq!(derivation.children.len(), 1);
    mocks.verify();
}

#[tokio::test]
async fn test_depth_is_checked_before_any_lookup() {
    let mocks = Mocks::new();
    let config = EngineConfig {
        max_nesting_depth: 1,
        ..Default::default()
    };

    let err = derive_children(&parent_with_service(), &mocks.lookup(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, DeriveError::NestingLimitExceeded { .. }));
    mocks.verify();
}
