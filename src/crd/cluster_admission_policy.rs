//! ClusterAdmissionPolicy Custom Resource Definition.
//!
//! A cluster-scoped policy: its rules apply to requests from every
//! namespace, minus the one the control plane itself runs in.

use k8s_openapi::api::admissionregistration::v1::RuleWithOperations;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::policy::{NAMESPACE_NAME_LABEL, Policy, PolicySpec};

/// ClusterAdmissionPolicy registers a policy against requests cluster-wide.
///
/// Example:
/// ```yaml
/// apiVersion: policies.kubewarden.io/v1alpha1
/// kind: ClusterAdmissionPolicy
/// metadata:
///   name: safe-labels
/// spec:
///   module: registry://ghcr.io/kubewarden/policies/safe-labels:v1.0.0
///   policyServer: default
///   rules:
///     - apiGroups: [""]
///       apiVersions: ["v1"]
///       resources: ["pods"]
///       operations: ["CREATE", "UPDATE"]
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "policies.kubewarden.io",
    version = "v1alpha1",
    kind = "ClusterAdmissionPolicy",
    plural = "clusteradmissionpolicies",
    shortname = "cap",
    printcolumn = r#"{"name":"Policy Server", "type":"string", "jsonPath":".spec.policyServer"}"#,
    printcolumn = r#"{"name":"Mutating", "type":"boolean", "jsonPath":".spec.mutating"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAdmissionPolicySpec {
    /// Fields shared with namespaced policies.
    #[serde(flatten)]
    pub policy: PolicySpec,

    /// Selects the namespaces whose requests the policy applies to.
    /// The control plane's own namespace is always excluded on top of this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
}

impl Policy for ClusterAdmissionPolicy {
    fn unique_name(&self) -> String {
        self.name_any()
    }

    fn name(&self) -> String {
        self.name_any()
    }

    fn namespace(&self) -> Option<String> {
        None
    }

    fn rules(&self) -> &[RuleWithOperations] {
        &self.spec.policy.rules
    }

    fn failure_policy(&self) -> Option<&str> {
        self.spec.policy.failure_policy.as_deref()
    }

    fn match_policy(&self) -> Option<&str> {
        self.spec.policy.match_policy.as_deref()
    }

    /// Declared selector plus an expression keeping the control plane's own
    /// namespace out of the policy's reach.
    fn namespace_selector(&self, deployments_namespace: &str) -> Option<LabelSelector> {
        let mut selector = self.spec.namespace_selector.clone().unwrap_or_default();
        selector
            .match_expressions
            .get_or_insert_with(Vec::new)
            .push(LabelSelectorRequirement {
                key: NAMESPACE_NAME_LABEL.to_string(),
                operator: "NotIn".to_string(),
                values: Some(vec![deployments_namespace.to_string()]),
            });
        Some(selector)
    }

    fn object_selector(&self) -> Option<&LabelSelector> {
        self.spec.policy.object_selector.as_ref()
    }

    fn side_effects(&self) -> Option<&str> {
        self.spec.policy.side_effects.as_deref()
    }

    fn timeout_seconds(&self) -> Option<i32> {
        self.spec.policy.timeout_seconds
    }

    fn mutating(&self) -> bool {
        self.spec.policy.mutating
    }
}
