//! Shared policy surface.
//!
//! `PolicySpec` carries the fields common to both policy CRDs; the `Policy`
//! trait exposes the read accessors the webhook registration reconciler
//! consumes, so it never needs to know which flavor it is looking at.

use k8s_openapi::api::admissionregistration::v1::RuleWithOperations;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label every namespace carries with its own name
pub const NAMESPACE_NAME_LABEL: &str = "kubernetes.io/metadata.name";

/// Fields shared by `ClusterAdmissionPolicy` and `AdmissionPolicy`.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    /// Location of the WebAssembly module that evaluates admission requests.
    pub module: String,

    /// Name of the policy server that hosts this policy (default "default").
    #[serde(default = "default_policy_server")]
    pub policy_server: String,

    /// Whether the policy is allowed to mutate incoming objects.
    /// Decides which registration flavor the policy is published under.
    #[serde(default)]
    pub mutating: bool,

    /// Resource/operation rules selecting the requests routed to the policy.
    #[serde(default)]
    pub rules: Vec<RuleWithOperations>,

    /// What the API server does when the dispatch target is unreachable
    /// (Fail or Ignore).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,

    /// How rules are matched against request kinds (Exact or Equivalent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<String>,

    /// Selects objects by label before they are routed to the policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_selector: Option<LabelSelector>,

    /// Side effect class declared by the policy (None, NoneOnDryRun, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,

    /// Seconds the API server waits for an answer before applying the
    /// failure policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,

    /// Free-form configuration handed to the policy at evaluation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl Default for PolicySpec {
    fn default() -> Self {
        Self {
            module: String::new(),
            policy_server: default_policy_server(),
            mutating: false,
            rules: Vec::new(),
            failure_policy: None,
            match_policy: None,
            object_selector: None,
            side_effects: None,
            timeout_seconds: None,
            settings: None,
        }
    }
}

fn default_policy_server() -> String {
    "default".to_string()
}

/// Read-only view of a policy, as consumed by the webhook registration
/// reconciler.
pub trait Policy {
    /// Cluster-wide unique name; doubles as the registration object's name
    /// and the final segment of its dispatch path.
    fn unique_name(&self) -> String;

    /// Plain metadata name, recorded on the registration object for
    /// back-reference.
    fn name(&self) -> String;

    /// Namespace the policy lives in; `None` for cluster-wide policies.
    fn namespace(&self) -> Option<String>;

    fn rules(&self) -> &[RuleWithOperations];

    fn failure_policy(&self) -> Option<&str>;

    fn match_policy(&self) -> Option<&str>;

    /// Namespace selector resolved against the namespace the control plane
    /// itself is deployed in.
    fn namespace_selector(&self, deployments_namespace: &str) -> Option<LabelSelector>;

    fn object_selector(&self) -> Option<&LabelSelector>;

    fn side_effects(&self) -> Option<&str>;

    fn timeout_seconds(&self) -> Option<i32>;

    /// Whether the policy mutates objects.
    fn mutating(&self) -> bool;
}
