//! NetworkBindingConfig CRD
//!
//! The single top-level desired-state object. Operand handlers read its
//! namespace, annotations, and node-placement preferences; they never write
//! it back.

use k8s_openapi::api::core::v1::{Affinity, Toleration};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "netbind.microscaler.io",
    version = "v1alpha1",
    kind = "NetworkBindingConfig",
    namespaced,
    status = "NetworkBindingConfigStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBindingConfigSpec {
    /// Placement and scheduling preferences for infrastructure components
    #[serde(default)]
    pub infra: ComponentConfig,
}

/// Per-component scheduling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    /// Node placement rules applied to every workload of this component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_placement: Option<NodePlacement>,
}

/// Node placement preferences (selector, affinity, tolerations)
///
/// Affinity and tolerations reuse the upstream Kubernetes types; their CRD
/// schemas are left open since the API server validates them on the pods.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    /// Node selector labels the workloads must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Pod affinity/anti-affinity rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_object")]
    pub affinity: Option<Affinity>,

    /// Tolerations applied to the workloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_array")]
    pub tolerations: Option<Vec<Toleration>>,
}

fn preserve_unknown_object(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "type": "object",
        "x-kubernetes-preserve-unknown-fields": true
    })
}

fn preserve_unknown_array(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "type": "array",
        "items": {
            "type": "object",
            "x-kubernetes-preserve-unknown-fields": true
        }
    })
}

/// Lifecycle state of the configuration as a whole
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum ConfigState {
    /// Operands have not been reconciled yet
    #[default]
    Pending,
    /// All managed operands match their desired state
    Deployed,
    /// One or more operands failed to reconcile
    Degraded,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBindingConfigStatus {
    /// Generation of the spec last acted upon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Aggregate state across all managed operands
    #[serde(default)]
    pub state: ConfigState,

    /// Last reconciliation error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Last reconciliation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,
}
