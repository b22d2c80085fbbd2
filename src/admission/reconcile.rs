//! Create-or-merge reconciliation shared by both registration flavors.
//!
//! The happy path is a single create. On an already-exists conflict the
//! current object is fetched once, mutated on a deep copy, and patched with
//! the computed difference. Repeated invocations with an unchanged policy
//! converge to a no-op: the diff comes out empty and no patch is issued.

use std::collections::BTreeMap;

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::Secret;
use kube::{Client, Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::admission::error::{self, Error, Result};
use crate::admission::merge;
use crate::admission::mutating::reconcile_mutating_webhook;
use crate::admission::store::{KubeRegistrationStore, RegistrationStore};
use crate::admission::validating::reconcile_validating_webhook;
use crate::crd::Policy;

/// A registration object flavor: standard metadata plus one replaceable
/// block of webhook entries.
pub trait RegistrationObject:
    Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Entry type of the behavior block
    type Entry: Clone + PartialEq;

    fn webhooks(&self) -> Option<&Vec<Self::Entry>>;

    fn webhooks_mut(&mut self) -> &mut Option<Vec<Self::Entry>>;
}

/// Ensure the cluster holds `desired`, creating it or merging it onto the
/// object already registered under its name.
pub(crate) async fn reconcile_configuration<K, S>(store: &S, desired: K) -> Result<()>
where
    K: RegistrationObject,
    S: RegistrationStore<K>,
{
    let name = desired.name_any();

    match store.create(&desired).await {
        Ok(_) => {
            info!(name = %name, "Created webhook configuration");
            Ok(())
        }
        Err(err) if error::is_already_exists(&err) => update_configuration(store, &desired).await,
        Err(source) => Err(Error::Create { name, source }),
    }
}

/// Merge `desired` onto the already-registered object.
///
/// Labels and annotations are unioned key by key, desired values winning on
/// collision, so additions from other actors survive. The webhook block is
/// owned exclusively by this reconciler: replaced wholesale whenever it
/// differs, left untouched when structurally equal.
async fn update_configuration<K, S>(store: &S, desired: &K) -> Result<()>
where
    K: RegistrationObject,
    S: RegistrationStore<K>,
{
    let name = desired.name_any();

    let current = store.get(&name).await.map_err(|source| Error::Get {
        name: name.clone(),
        source,
    })?;

    let mut patched = current.clone();

    merge_metadata_map(&mut patched.meta_mut().labels, &desired.meta().labels);
    merge_metadata_map(
        &mut patched.meta_mut().annotations,
        &desired.meta().annotations,
    );

    if patched.webhooks() != desired.webhooks() {
        *patched.webhooks_mut() = desired.webhooks().cloned();
    }

    let patch = merge::diff(
        &serde_json::to_value(&current)?,
        &serde_json::to_value(&patched)?,
    );
    if merge::is_noop(&patch) {
        debug!(name = %name, "Webhook configuration already in sync");
        return Ok(());
    }

    store
        .patch_merge(&name, &patch)
        .await
        .map_err(|source| Error::Patch {
            name: name.clone(),
            source,
        })?;

    info!(name = %name, "Patched webhook configuration");
    Ok(())
}

/// Entry point bundling the two flavor stores with the namespace the
/// control plane is deployed in.
///
/// Policies declare whether they mutate; the reconciler publishes them
/// under the matching configuration flavor.
pub struct WebhookReconciler<V, M> {
    validating: V,
    mutating: M,
    deployments_namespace: String,
}

impl WebhookReconciler<
    KubeRegistrationStore<ValidatingWebhookConfiguration>,
    KubeRegistrationStore<MutatingWebhookConfiguration>,
> {
    /// Reconciler backed by the cluster API
    pub fn from_client(client: Client, deployments_namespace: &str) -> Self {
        Self::new(
            KubeRegistrationStore::new(client.clone()),
            KubeRegistrationStore::new(client),
            deployments_namespace,
        )
    }
}

impl<V, M> WebhookReconciler<V, M>
where
    V: RegistrationStore<ValidatingWebhookConfiguration>,
    M: RegistrationStore<MutatingWebhookConfiguration>,
{
    pub fn new(validating: V, mutating: M, deployments_namespace: &str) -> Self {
        Self {
            validating,
            mutating,
            deployments_namespace: deployments_namespace.to_string(),
        }
    }

    /// Ensure the registration object for `policy` reflects its current
    /// declared state.
    pub async fn reconcile(
        &self,
        policy: &impl Policy,
        admission_secret: &Secret,
        policy_server_name: &str,
    ) -> Result<()> {
        if policy.mutating() {
            reconcile_mutating_webhook(
                &self.mutating,
                policy,
                admission_secret,
                policy_server_name,
                &self.deployments_namespace,
            )
            .await
        } else {
            reconcile_validating_webhook(
                &self.validating,
                policy,
                admission_secret,
                policy_server_name,
                &self.deployments_namespace,
            )
            .await
        }
    }
}

/// Union `desired` into `current`, initializing the map when absent
fn merge_metadata_map(
    current: &mut Option<BTreeMap<String, String>>,
    desired: &Option<BTreeMap<String, String>>,
) {
    let Some(desired) = desired else { return };
    let merged = current.get_or_insert_with(BTreeMap::new);
    for (key, value) in desired {
        merged.insert(key.clone(), value.clone());
    }
}
