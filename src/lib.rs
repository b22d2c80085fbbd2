//! policy-operator library crate
//!
//! Keeps a cluster's admission-webhook registration objects synchronized
//! with the policies that declare them. The surrounding control loop decides
//! *when* to reconcile; this crate decides *what* the registration object
//! must look like and how to get the cluster there without clobbering
//! metadata added by other actors.

pub mod admission;
pub mod crd;

pub use admission::{
    Error, KubeRegistrationStore, RegistrationStore, WebhookReconciler,
    reconcile_mutating_webhook, reconcile_validating_webhook,
};
pub use crd::{AdmissionPolicy, ClusterAdmissionPolicy, Policy};
