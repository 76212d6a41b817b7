use appnest_store::{KindClient, ObjectKey, ObjectStore, StoreClient, StoreError, StoredObject};
use async_trait::async_trait;

// --- Test Object ---

#[derive(Clone, Debug, PartialEq)]
struct Volume {
    namespace: String,
    name: String,
    size_gb: u32,
    protected: bool,
}

impl Volume {
    fn new(namespace: &str, name: &str, size_gb: u32) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            size_gb,
            protected: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum VolumeError {
    #[error("volume {0} cannot shrink")]
    Shrink(String),
    #[error("volume {0} is protected")]
    Protected(String),
}

#[async_trait]
impl StoredObject for Volume {
    const KIND: &'static str = "Volume";
    type Error = VolumeError;

    fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }

    async fn on_put(&mut self, previous: Option<&Self>) -> Result<(), Self::Error> {
        match previous {
            Some(prev) if prev.size_gb > self.size_gb => Err(VolumeError::Shrink(self.name.clone())),
            _ => Ok(()),
        }
    }

    async fn on_delete(&self) -> Result<(), Self::Error> {
        if self.protected {
            return Err(VolumeError::Protected(self.name.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("volume lookup: {0}")]
struct VolumeLookupError(String);

struct VolumeClient {
    inner: StoreClient<Volume>,
}

impl KindClient<Volume> for VolumeClient {
    type Error = VolumeLookupError;

    fn inner(&self) -> &StoreClient<Volume> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        VolumeLookupError(e.to_string())
    }
}

// --- Tests ---

#[tokio::test]
async fn test_store_full_lifecycle() {
    let (store, client) = ObjectStore::<Volume>::new(10);
    let handle = tokio::spawn(store.run());

    // 1. Put
    let replaced = client.put(Volume::new("prod", "data", 10)).await.unwrap();
    assert!(replaced.is_none());

    // 2. Replace returns the previous object
    let replaced = client.put(Volume::new("prod", "data", 20)).await.unwrap();
    assert_eq!(replaced.unwrap().size_gb, 10);

    // 3. on_put hook can reject
    let shrink = client.put(Volume::new("prod", "data", 5)).await;
    assert!(matches!(shrink, Err(StoreError::ObjectError(_))));

    // 4. Get
    let fetched = client.get(ObjectKey::new("prod", "data")).await.unwrap();
    assert_eq!(fetched.unwrap().size_gb, 20);
    assert!(client
        .get(ObjectKey::new("prod", "missing"))
        .await
        .unwrap()
        .is_none());

    // 5. Delete
    let removed = client.delete(ObjectKey::new("prod", "data")).await.unwrap();
    assert_eq!(removed.name, "data");
    let again = client.delete(ObjectKey::new("prod", "data")).await;
    assert!(matches!(again, Err(StoreError::NotFound(_))));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_list_is_key_ordered_and_namespace_filtered() {
    let (store, client) = ObjectStore::<Volume>::new(10);
    tokio::spawn(store.run());

    for (ns, name) in [("b", "z"), ("a", "y"), ("b", "a"), ("a", "x")] {
        client.put(Volume::new(ns, name, 1)).await.unwrap();
    }

    let all: Vec<String> = client
        .list(None)
        .await
        .unwrap()
        .iter()
        .map(|v| format!("{}/{}", v.namespace, v.name))
        .collect();
    assert_eq!(all, vec!["a/x", "a/y", "b/a", "b/z"]);

    let only_b = client.list(Some("b".into())).await.unwrap();
    assert_eq!(only_b.len(), 2);
}

#[tokio::test]
async fn test_invalid_key_and_protected_delete() {
    let (store, client) = ObjectStore::<Volume>::new(10);
    tokio::spawn(store.run());

    let invalid = client.put(Volume::new("", "nameless", 1)).await;
    assert!(matches!(invalid, Err(StoreError::InvalidKey(_))));

    let mut locked = Volume::new("prod", "locked", 1);
    locked.protected = true;
    client.put(locked).await.unwrap();
    let denied = client.delete(ObjectKey::new("prod", "locked")).await;
    assert!(matches!(denied, Err(StoreError::ObjectError(_))));
}

#[tokio::test]
async fn test_kind_client_maps_errors() {
    let (store, client) = ObjectStore::<Volume>::new(10);
    let volumes = VolumeClient { inner: client };

    // Store never started and then dropped: the channel is closed.
    drop(store);

    let result = volumes.get(ObjectKey::new("prod", "data")).await;
    match result {
        Err(VolumeLookupError(msg)) => assert_eq!(msg, "Store closed"),
        other => panic!("expected a lookup error, got {:?}", other.map(|v| v.is_some())),
    }
}
