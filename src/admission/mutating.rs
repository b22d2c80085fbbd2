//! Mutating webhook registration.
//!
//! Policies allowed to rewrite incoming objects are published through a
//! `MutatingWebhookConfiguration`; everything but the entry type matches
//! the validating flavor.

use k8s_openapi::ByteString;
use k8s_openapi::api::admissionregistration::v1::{MutatingWebhook, MutatingWebhookConfiguration};
use k8s_openapi::api::core::v1::Secret;
use tracing::debug;

use crate::admission::ADMISSION_REVIEW_VERSION;
use crate::admission::desired::{ca_bundle, configuration_metadata, webhook_entry};
use crate::admission::error::Result;
use crate::admission::reconcile::{RegistrationObject, reconcile_configuration};
use crate::admission::store::RegistrationStore;
use crate::crd::Policy;

impl RegistrationObject for MutatingWebhookConfiguration {
    type Entry = MutatingWebhook;

    fn webhooks(&self) -> Option<&Vec<MutatingWebhook>> {
        self.webhooks.as_ref()
    }

    fn webhooks_mut(&mut self) -> &mut Option<Vec<MutatingWebhook>> {
        &mut self.webhooks
    }
}

/// Build the configuration a mutating policy should be registered under.
pub fn desired_mutating_configuration(
    policy: &impl Policy,
    ca_bundle: ByteString,
    policy_server_name: &str,
    deployments_namespace: &str,
) -> MutatingWebhookConfiguration {
    let entry = webhook_entry(policy, ca_bundle, policy_server_name, deployments_namespace);

    MutatingWebhookConfiguration {
        metadata: configuration_metadata(policy),
        webhooks: Some(vec![MutatingWebhook {
            name: entry.name,
            admission_review_versions: vec![ADMISSION_REVIEW_VERSION.to_string()],
            client_config: entry.client_config,
            rules: entry.rules,
            failure_policy: entry.failure_policy,
            match_policy: entry.match_policy,
            namespace_selector: entry.namespace_selector,
            object_selector: entry.object_selector,
            side_effects: entry.side_effects,
            timeout_seconds: entry.timeout_seconds,
            ..Default::default()
        }]),
    }
}

/// Register a mutating policy, creating or updating its configuration.
pub async fn reconcile_mutating_webhook<P, S>(
    store: &S,
    policy: &P,
    admission_secret: &Secret,
    policy_server_name: &str,
    deployments_namespace: &str,
) -> Result<()>
where
    P: Policy,
    S: RegistrationStore<MutatingWebhookConfiguration>,
{
    debug!(policy = %policy.unique_name(), "Reconciling mutating webhook configuration");

    let ca = ca_bundle(admission_secret)?;
    let desired =
        desired_mutating_configuration(policy, ca, policy_server_name, deployments_namespace);
    reconcile_configuration(store, desired).await
}
