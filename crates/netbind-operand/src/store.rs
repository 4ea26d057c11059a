//! Abstract object-store client used by the operand engine.
//!
//! The engine never talks to the Kubernetes API directly; it goes through
//! [`ObjectStore`], which keeps each engine instance statically bound to one
//! concrete kind and lets unit tests substitute an in-memory store.

use crate::error::StoreError;
use async_trait::async_trait;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::{Api, DeleteParams, PostParams};
use kube::{Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// Identity of one managed object.
///
/// The kind is carried by the store's type parameter; cluster-scoped kinds
/// have no namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentity {
    /// Namespace, absent for cluster-scoped kinds
    pub namespace: Option<String>,
    /// Object name
    pub name: String,
}

impl ObjectIdentity {
    /// Identity of a namespaced object.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Identity of a cluster-scoped object.
    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}", namespace, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One read/write round trip per call against the backing store.
///
/// `update` uses optimistic concurrency: the write carries the resource
/// version observed by the preceding read and fails with
/// [`StoreError::Conflict`] if the stored version moved. Conflicts are
/// surfaced, never retried here.
#[async_trait]
pub trait ObjectStore<K>: Send + Sync {
    /// Fetches the object with the given identity.
    async fn get(&self, id: &ObjectIdentity) -> Result<K, StoreError>;

    /// Creates the object.
    async fn create(&self, obj: &K) -> Result<K, StoreError>;

    /// Replaces the stored object with `obj`.
    async fn update(&self, obj: &K) -> Result<K, StoreError>;

    /// Deletes the object with the given identity.
    async fn delete(&self, id: &ObjectIdentity) -> Result<(), StoreError>;
}

/// Kubernetes-backed store for namespaced kinds.
pub struct NamespacedKubeStore<K> {
    client: Client,
    _kind: PhantomData<K>,
}

impl<K> NamespacedKubeStore<K> {
    /// Wraps a Kubernetes client for one namespaced kind.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for NamespacedKubeStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedKubeStore").finish_non_exhaustive()
    }
}

fn required_namespace(namespace: Option<&str>) -> Result<&str, StoreError> {
    namespace.ok_or_else(|| StoreError::Api("namespaced kind requires a namespace".to_string()))
}

fn required_name(name: Option<&str>) -> Result<&str, StoreError> {
    name.ok_or_else(|| StoreError::Api("object has no name".to_string()))
}

#[async_trait]
impl<K> ObjectStore<K> for NamespacedKubeStore<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn get(&self, id: &ObjectIdentity) -> Result<K, StoreError> {
        let namespace = required_namespace(id.namespace.as_deref())?;
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(&id.name).await.map_err(StoreError::from_kube)
    }

    async fn create(&self, obj: &K) -> Result<K, StoreError> {
        let namespace = required_namespace(obj.meta().namespace.as_deref())?;
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), obj)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn update(&self, obj: &K) -> Result<K, StoreError> {
        let namespace = required_namespace(obj.meta().namespace.as_deref())?;
        let name = required_name(obj.meta().name.as_deref())?;
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.replace(name, &PostParams::default(), obj)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn delete(&self, id: &ObjectIdentity) -> Result<(), StoreError> {
        let namespace = required_namespace(id.namespace.as_deref())?;
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.delete(&id.name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(StoreError::from_kube)
    }
}

/// Kubernetes-backed store for cluster-scoped kinds.
pub struct ClusterKubeStore<K> {
    client: Client,
    _kind: PhantomData<K>,
}

impl<K> ClusterKubeStore<K> {
    /// Wraps a Kubernetes client for one cluster-scoped kind.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for ClusterKubeStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterKubeStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl<K> ObjectStore<K> for ClusterKubeStore<K>
where
    K: Resource<Scope = ClusterResourceScope>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn get(&self, id: &ObjectIdentity) -> Result<K, StoreError> {
        let api: Api<K> = Api::all(self.client.clone());
        api.get(&id.name).await.map_err(StoreError::from_kube)
    }

    async fn create(&self, obj: &K) -> Result<K, StoreError> {
        let api: Api<K> = Api::all(self.client.clone());
        api.create(&PostParams::default(), obj)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn update(&self, obj: &K) -> Result<K, StoreError> {
        let name = required_name(obj.meta().name.as_deref())?;
        let api: Api<K> = Api::all(self.client.clone());
        api.replace(name, &PostParams::default(), obj)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn delete(&self, id: &ObjectIdentity) -> Result<(), StoreError> {
        let api: Api<K> = Api::all(self.client.clone());
        api.delete(&id.name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(StoreError::from_kube)
    }
}
