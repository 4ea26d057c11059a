//! Mock object store for unit testing.
//!
//! Stores objects in memory keyed by identity and can be configured to fail
//! reads, so tests can exercise every branch of the engine without a running
//! cluster.

use crate::error::StoreError;
use crate::store::{ObjectIdentity, ObjectStore};
use async_trait::async_trait;
use kube::Resource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`ObjectStore`] implementation.
#[derive(Debug)]
pub struct MockStore<K> {
    objects: Arc<Mutex<HashMap<String, K>>>,
    read_failure: Arc<Mutex<Option<String>>>,
    next_version: Arc<Mutex<u64>>,
}

impl<K> Clone for MockStore<K> {
    fn clone(&self) -> Self {
        Self {
            objects: Arc::clone(&self.objects),
            read_failure: Arc::clone(&self.read_failure),
            next_version: Arc::clone(&self.next_version),
        }
    }
}

impl<K> Default for MockStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> MockStore<K> {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            read_failure: Arc::new(Mutex::new(None)),
            next_version: Arc::new(Mutex::new(1)),
        }
    }

    /// Make every subsequent read fail with the given message (for testing
    /// error paths)
    pub fn fail_reads(&self, message: impl Into<String>) {
        *self.read_failure.lock().unwrap() = Some(message.into());
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// True when the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bump_version(&self) -> String {
        let mut version = self.next_version.lock().unwrap();
        let current = *version;
        *version += 1;
        current.to_string()
    }
}

impl<K> MockStore<K>
where
    K: Resource + Clone,
{
    /// Seed an object into the store (for test setup); assigns a resource
    /// version
    pub fn add(&self, obj: K) {
        let mut stored = obj;
        stored.meta_mut().resource_version = Some(self.bump_version());
        let key = object_key(&stored).unwrap();
        self.objects.lock().unwrap().insert(key, stored);
    }

    /// Read a stored object back (for test assertions)
    pub fn get_stored(&self, id: &ObjectIdentity) -> Option<K> {
        self.objects.lock().unwrap().get(&id.to_string()).cloned()
    }
}

fn object_key<K: Resource>(obj: &K) -> Result<String, StoreError> {
    let meta = obj.meta();
    let name = meta
        .name
        .clone()
        .ok_or_else(|| StoreError::Api("object has no name".to_string()))?;
    Ok(ObjectIdentity {
        namespace: meta.namespace.clone(),
        name,
    }
    .to_string())
}

#[async_trait]
impl<K> ObjectStore<K> for MockStore<K>
where
    K: Resource + Clone + Send + Sync + 'static,
{
    async fn get(&self, id: &ObjectIdentity) -> Result<K, StoreError> {
        if let Some(message) = self.read_failure.lock().unwrap().clone() {
            return Err(StoreError::Api(message));
        }
        self.objects
            .lock()
            .unwrap()
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, obj: &K) -> Result<K, StoreError> {
        let key = object_key(obj)?;
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key) {
            return Err(StoreError::Api(format!("already exists: {key}")));
        }
        let mut stored = obj.clone();
        stored.meta_mut().resource_version = Some(self.bump_version());
        objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, obj: &K) -> Result<K, StoreError> {
        let key = object_key(obj)?;
        let mut objects = self.objects.lock().unwrap();
        let current = objects
            .get(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        // replace semantics: a stale resource version is rejected
        if obj.meta().resource_version != current.meta().resource_version {
            return Err(StoreError::Conflict(key));
        }
        let mut stored = obj.clone();
        stored.meta_mut().resource_version = Some(self.bump_version());
        objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &ObjectIdentity) -> Result<(), StoreError> {
        self.objects
            .lock()
            .unwrap()
            .remove(&id.to_string())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
