//! Capability interface over the cluster's webhook configuration store.
//!
//! The reconciler only needs create, get-by-name, and merge-patch, so that
//! surface lives behind a trait and tests drive it with an in-memory fake
//! instead of a live control plane.

use std::future::Future;

use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::{Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Minimal store surface for cluster-scoped webhook configuration objects.
///
/// Errors are `kube::Error` so the already-exists and not-found reasons the
/// reconciler branches on survive the abstraction.
pub trait RegistrationStore<K> {
    /// Create the object, failing with an already-exists error when the
    /// name is taken
    fn create(&self, desired: &K) -> impl Future<Output = Result<K, kube::Error>>;

    /// Fetch the current object by name
    fn get(&self, name: &str) -> impl Future<Output = Result<K, kube::Error>>;

    /// Apply an RFC 7386 merge patch to the named object
    fn patch_merge(
        &self,
        name: &str,
        patch: &serde_json::Value,
    ) -> impl Future<Output = Result<K, kube::Error>>;
}

impl<K, T> RegistrationStore<K> for &T
where
    T: RegistrationStore<K>,
{
    async fn create(&self, desired: &K) -> Result<K, kube::Error> {
        (**self).create(desired).await
    }

    async fn get(&self, name: &str) -> Result<K, kube::Error> {
        (**self).get(name).await
    }

    async fn patch_merge(&self, name: &str, patch: &serde_json::Value) -> Result<K, kube::Error> {
        (**self).patch_merge(name, patch).await
    }
}

/// Store backed by the cluster API, one instance per configuration type
pub struct KubeRegistrationStore<K> {
    api: Api<K>,
}

impl<K> KubeRegistrationStore<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + std::fmt::Debug,
{
    /// Build a store for a cluster-scoped configuration type
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

impl<K> RegistrationStore<K> for KubeRegistrationStore<K>
where
    K: Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + std::fmt::Debug,
{
    async fn create(&self, desired: &K) -> Result<K, kube::Error> {
        self.api.create(&PostParams::default(), desired).await
    }

    async fn get(&self, name: &str) -> Result<K, kube::Error> {
        self.api.get(name).await
    }

    async fn patch_merge(&self, name: &str, patch: &serde_json::Value) -> Result<K, kube::Error> {
        self.api
            .patch(name, &PatchParams::default(), &Patch::Merge(patch))
            .await
    }
}
