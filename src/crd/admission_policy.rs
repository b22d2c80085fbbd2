//! AdmissionPolicy Custom Resource Definition.
//!
//! The namespaced flavor: rules only ever apply to requests targeting the
//! namespace the policy lives in.

use k8s_openapi::api::admissionregistration::v1::RuleWithOperations;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::policy::{NAMESPACE_NAME_LABEL, Policy, PolicySpec};

/// AdmissionPolicy registers a policy inside a single namespace.
///
/// Example:
/// ```yaml
/// apiVersion: policies.kubewarden.io/v1alpha1
/// kind: AdmissionPolicy
/// metadata:
///   name: no-privileged-pods
///   namespace: team-a
/// spec:
///   module: registry://ghcr.io/kubewarden/policies/pod-privileged:v0.2.0
///   rules:
///     - apiGroups: [""]
///       apiVersions: ["v1"]
///       resources: ["pods"]
///       operations: ["CREATE"]
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "policies.kubewarden.io",
    version = "v1alpha1",
    kind = "AdmissionPolicy",
    plural = "admissionpolicies",
    shortname = "ap",
    namespaced,
    printcolumn = r#"{"name":"Policy Server", "type":"string", "jsonPath":".spec.policyServer"}"#,
    printcolumn = r#"{"name":"Mutating", "type":"boolean", "jsonPath":".spec.mutating"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionPolicySpec {
    /// Fields shared with cluster-wide policies.
    #[serde(flatten)]
    pub policy: PolicySpec,
}

impl Policy for AdmissionPolicy {
    /// Namespace-qualified so two namespaces can hold same-named policies
    /// without their registration objects colliding.
    fn unique_name(&self) -> String {
        format!(
            "{}-{}",
            ResourceExt::namespace(self).unwrap_or_default(),
            self.name_any()
        )
    }

    fn name(&self) -> String {
        self.name_any()
    }

    fn namespace(&self) -> Option<String> {
        ResourceExt::namespace(self)
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

    /// Pinned to the policy's own namespace; namespaced policies never get
    /// to select other namespaces.
    fn namespace_selector(&self, _deployments_namespace: &str) -> Option<LabelSelector> {
        Some(LabelSelector {
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: NAMESPACE_NAME_LABEL.to_string(),
                operator: "In".to_string(),
                values: Some(vec![ResourceExt::namespace(self).unwrap_or_default()]),
            }]),
            ..Default::default()
        })
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
