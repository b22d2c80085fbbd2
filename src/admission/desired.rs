//! Desired-state construction for webhook registration objects.
//!
//! Pure functions: given a policy, its trust bundle, and the dispatch
//! target, produce the object the cluster should hold. The validating and
//! mutating flavors share everything but the final entry type, so the
//! common parts are assembled here.

use std::collections::BTreeMap;

use k8s_openapi::ByteString;
use k8s_openapi::api::admissionregistration::v1::{
    RuleWithOperations, ServiceReference, WebhookClientConfig,
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;

use crate::admission::error::Error;
use crate::admission::{
    ADMISSION_PATH_PREFIX, MEMBERSHIP_LABEL_KEY, POLICY_NAME_ANNOTATION_KEY,
    POLICY_NAMESPACE_ANNOTATION_KEY, POLICY_SCOPE_LABEL_KEY, POLICY_SERVER_CA_ROOT_PEM_KEY,
    POLICY_SERVER_PORT,
};
use crate::crd::Policy;

/// Scope recorded for policies that live in a namespace
const SCOPE_NAMESPACE: &str = "namespace";
/// Scope recorded for cluster-wide policies
const SCOPE_CLUSTER: &str = "cluster";
/// Suffix of every webhook entry name; diagnostic, not used for lookup
const WEBHOOK_NAME_SUFFIX: &str = "kubewarden.admission";
/// Side effect class assumed when a policy declares none
const DEFAULT_SIDE_EFFECTS: &str = "None";

/// Extract the policy server CA bundle from its provisioning secret
pub fn ca_bundle(secret: &Secret) -> Result<ByteString, Error> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(POLICY_SERVER_CA_ROOT_PEM_KEY))
        .cloned()
        .ok_or_else(|| Error::MissingCaBundle(secret.name_any()))
}

/// Behavior entry fields shared by the validating and mutating flavors.
pub(crate) struct WebhookEntry {
    pub name: String,
    pub client_config: WebhookClientConfig,
    pub rules: Option<Vec<RuleWithOperations>>,
    pub failure_policy: Option<String>,
    pub match_policy: Option<String>,
    pub namespace_selector: Option<LabelSelector>,
    pub object_selector: Option<LabelSelector>,
    pub side_effects: String,
    pub timeout_seconds: Option<i32>,
}

/// Assemble the behavior entry registering `policy` against the policy
/// server that evaluates it.
pub(crate) fn webhook_entry(
    policy: &impl Policy,
    ca_bundle: ByteString,
    policy_server_name: &str,
    deployments_namespace: &str,
) -> WebhookEntry {
    let unique_name = policy.unique_name();

    let service = ServiceReference {
        namespace: deployments_namespace.to_string(),
        name: policy_server_name.to_string(),
        path: Some(admission_path(&unique_name)),
        port: Some(POLICY_SERVER_PORT),
    };

    WebhookEntry {
        name: format!("{unique_name}.{WEBHOOK_NAME_SUFFIX}"),
        client_config: WebhookClientConfig {
            service: Some(service),
            ca_bundle: Some(ca_bundle),
            url: None,
        },
        rules: Some(policy.rules().to_vec()),
        failure_policy: policy.failure_policy().map(str::to_string),
        match_policy: policy.match_policy().map(str::to_string),
        namespace_selector: policy.namespace_selector(deployments_namespace),
        object_selector: policy.object_selector().cloned(),
        side_effects: policy
            .side_effects()
            .unwrap_or(DEFAULT_SIDE_EFFECTS)
            .to_string(),
        timeout_seconds: policy.timeout_seconds(),
    }
}

/// Metadata shared by both registration flavors: identity, membership and
/// scope labels, back-reference annotations.
pub(crate) fn configuration_metadata(policy: &impl Policy) -> ObjectMeta {
    let namespace = policy.namespace().unwrap_or_default();
    let scope = if namespace.is_empty() {
        SCOPE_CLUSTER
    } else {
        SCOPE_NAMESPACE
    };

    ObjectMeta {
        name: Some(policy.unique_name()),
        labels: Some(BTreeMap::from([
            (MEMBERSHIP_LABEL_KEY.to_string(), "true".to_string()),
            (POLICY_SCOPE_LABEL_KEY.to_string(), scope.to_string()),
        ])),
        annotations: Some(BTreeMap::from([
            (POLICY_NAME_ANNOTATION_KEY.to_string(), policy.name()),
            (POLICY_NAMESPACE_ANNOTATION_KEY.to_string(), namespace),
        ])),
        ..Default::default()
    }
}

/// Dispatch path for a policy; one registration maps to exactly one route
fn admission_path(unique_name: &str) -> String {
    format!("{ADMISSION_PATH_PREFIX}/{unique_name}")
}
