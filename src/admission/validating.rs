//! Validating webhook registration.
//!
//! Policies that only accept or reject requests are published through a
//! `ValidatingWebhookConfiguration` named after the policy.

use k8s_openapi::ByteString;
use k8s_openapi::api::admissionregistration::v1::{
    ValidatingWebhook, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::core::v1::Secret;
use tracing::debug;

use crate::admission::ADMISSION_REVIEW_VERSION;
use crate::admission::desired::{ca_bundle, configuration_metadata, webhook_entry};
use crate::admission::error::Result;
use crate::admission::reconcile::{RegistrationObject, reconcile_configuration};
use crate::admission::store::RegistrationStore;
use crate::crd::Policy;

impl RegistrationObject for ValidatingWebhookConfiguration {
    type Entry = ValidatingWebhook;

    fn webhooks(&self) -> Option<&Vec<ValidatingWebhook>> {
        self.webhooks.as_ref()
    }

    fn webhooks_mut(&mut self) -> &mut Option<Vec<ValidatingWebhook>> {
        &mut self.webhooks
    }
}

/// Build the configuration a validating policy should be registered under.
pub fn desired_validating_configuration(
    policy: &impl Policy,
    ca_bundle: ByteString,
    policy_server_name: &str,
    deployments_namespace: &str,
) -> ValidatingWebhookConfiguration {
    let entry = webhook_entry(policy, ca_bundle, policy_server_name, deployments_namespace);

    ValidatingWebhookConfiguration {
        metadata: configuration_metadata(policy),
        webhooks: Some(vec![ValidatingWebhook {
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

/// Register a validating policy, creating or updating its configuration.
pub async fn reconcile_validating_webhook<P, S>(
    store: &S,
    policy: &P,
    admission_secret: &Secret,
    policy_server_name: &str,
    deployments_namespace: &str,
) -> Result<()>
where
    P: Policy,
    S: RegistrationStore<ValidatingWebhookConfiguration>,
{
    debug!(policy = %policy.unique_name(), "Reconciling validating webhook configuration");

    let ca = ca_bundle(admission_secret)?;
    let desired =
        desired_validating_configuration(policy, ca, policy_server_name, deployments_namespace);
    reconcile_configuration(store, desired).await
}
