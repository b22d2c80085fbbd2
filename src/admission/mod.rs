//! Admission webhook registration reconciliation.
//!
//! Given a policy, its trust bundle, and the policy server that evaluates
//! it, this module ensures the cluster holds a matching webhook
//! configuration: build the desired object, try to create it, and when it
//! already exists merge metadata key by key and replace the webhook block
//! wholesale if it drifted. Labels and annotations added by other actors
//! are never discarded.

pub mod desired;
pub mod error;
pub mod merge;
mod mutating;
mod reconcile;
pub mod store;
mod validating;

pub use desired::ca_bundle;
pub use error::{Error, Result};
pub use mutating::{desired_mutating_configuration, reconcile_mutating_webhook};
pub use reconcile::{RegistrationObject, WebhookReconciler};
pub use store::{KubeRegistrationStore, RegistrationStore};
pub use validating::{desired_validating_configuration, reconcile_validating_webhook};

/// Port the policy server listens on for admission requests
pub const POLICY_SERVER_PORT: i32 = 8443;
/// Base path segment admission requests are dispatched under
pub const ADMISSION_PATH_PREFIX: &str = "/validate";
/// Secret key holding the policy server's root CA bundle
pub const POLICY_SERVER_CA_ROOT_PEM_KEY: &str = "policy-server-root-ca-pem";
/// Label marking a webhook configuration as operator-managed
pub const MEMBERSHIP_LABEL_KEY: &str = "kubewarden";
/// Label recording whether the originating policy is namespaced or cluster-wide
pub const POLICY_SCOPE_LABEL_KEY: &str = "kubewardenPolicyScope";
/// Annotation recording the originating policy's name
pub const POLICY_NAME_ANNOTATION_KEY: &str = "kubewardenPolicyName";
/// Annotation recording the originating policy's namespace
pub const POLICY_NAMESPACE_ANNOTATION_KEY: &str = "kubewardenPolicyNamespace";
/// Only AdmissionReview version the dispatch protocol speaks
pub const ADMISSION_REVIEW_VERSION: &str = "v1";
