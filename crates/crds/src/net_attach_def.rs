//! NetworkAttachmentDefinition CRD
//!
//! Typed view of the Multus `k8s.cni.cncf.io/v1` resource. The CRD itself is
//! owned by the cluster's network plumbing; this crate only defines the type
//! so the operator can create and update instances.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[kube(
    group = "k8s.cni.cncf.io",
    version = "v1",
    kind = "NetworkAttachmentDefinition",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachmentDefinitionSpec {
    /// CNI configuration payload, verbatim JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}
