//! Property-based tests for desired-state construction and merge-patch
//! computation.
//!
//! Uses proptest to generate random inputs and verify invariants.

use k8s_openapi::ByteString;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use proptest::prelude::*;
use serde_json::Value;

use policy_operator::admission::{desired_validating_configuration, merge};
use policy_operator::crd::{
    AdmissionPolicy, AdmissionPolicySpec, ClusterAdmissionPolicy, ClusterAdmissionPolicySpec,
    PolicySpec,
};

/// Strategy for RFC 1123-ish resource names.
fn resource_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,30}"
}

/// Strategy for JSON documents without null members.
///
/// A merge patch cannot distinguish "set to null" from "delete", so the
/// round-trip property only holds for documents that never store null as
/// an object member — which is all the reconciler ever diffs.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for JSON objects, the only document shape the reconciler diffs.
fn arb_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", arb_value(), 0..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

fn cluster_policy(name: &str) -> ClusterAdmissionPolicy {
    ClusterAdmissionPolicy {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: ClusterAdmissionPolicySpec {
            policy: PolicySpec {
                module: "registry://example/policy:v1.0.0".to_string(),
                ..Default::default()
            },
            namespace_selector: None,
        },
    }
}

proptest! {
    #[test]
    fn dispatch_path_is_prefix_plus_unique_name(name in resource_name()) {
        let policy = cluster_policy(&name);
        let config = desired_validating_configuration(
            &policy,
            ByteString(b"ca".to_vec()),
            "policy-server",
            "kubewarden",
        );

        prop_assert_eq!(config.metadata.name, Some(name.clone()));

        let webhooks = config.webhooks.unwrap();
        let service = webhooks.first().unwrap().client_config.service.as_ref().unwrap();
        let expected_path = format!("/validate/{name}");
        prop_assert_eq!(
            service.path.as_deref(),
            Some(expected_path.as_str())
        );
    }

    #[test]
    fn namespaced_policies_always_get_namespace_scope(
        name in resource_name(),
        namespace in resource_name(),
    ) {
        let policy = AdmissionPolicy {
            metadata: ObjectMeta {
                name: Some(name),
                namespace: Some(namespace),
                ..Default::default()
            },
            spec: AdmissionPolicySpec {
                policy: PolicySpec {
                    module: "registry://example/policy:v1.0.0".to_string(),
                    ..Default::default()
                },
            },
        };

        let config = desired_validating_configuration(
            &policy,
            ByteString(b"ca".to_vec()),
            "policy-server",
            "kubewarden",
        );

        let labels = config.metadata.labels.unwrap();
        prop_assert_eq!(
            labels.get("kubewardenPolicyScope"),
            Some(&"namespace".to_string())
        );
    }

    #[test]
    fn merge_diff_of_equal_objects_is_a_noop(doc in arb_object()) {
        prop_assert!(merge::is_noop(&merge::diff(&doc, &doc)));
    }

    #[test]
    fn applying_the_computed_diff_reproduces_the_modified_document(
        original in arb_object(),
        modified in arb_object(),
    ) {
        let patch = merge::diff(&original, &modified);
        let mut patched = original.clone();
        json_patch::merge(&mut patched, &patch);
        prop_assert_eq!(patched, modified);
    }
}
