//! SecurityConstraint CRD
//!
//! Cluster-scoped security policy granting the privileged rights the binding
//! CNI installer needs on the nodes it runs on.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[kube(
    group = "netbind.microscaler.io",
    version = "v1alpha1",
    kind = "SecurityConstraint"
)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConstraintSpec {
    /// Allow containers to run privileged
    #[serde(default)]
    pub allow_privileged_container: bool,

    /// Allow host-path volume plugins
    #[serde(default)]
    pub allow_host_dir_volume_plugin: bool,

    /// Allow host IPC namespace access
    #[serde(default)]
    pub allow_host_ipc: bool,

    /// Allow host network access
    #[serde(default)]
    pub allow_host_network: bool,

    /// Allow host PID namespace access
    #[serde(default)]
    pub allow_host_pid: bool,

    /// Allow binding host ports
    #[serde(default)]
    pub allow_host_ports: bool,

    /// Require a read-only root filesystem
    #[serde(default)]
    pub read_only_root_filesystem: bool,

    /// UID strategy for constrained pods
    #[serde(default)]
    pub run_as_user: StrategyOptions,

    /// SELinux context strategy for constrained pods
    #[serde(default)]
    pub se_linux_context: StrategyOptions,

    /// Service accounts granted this constraint
    /// (`system:serviceaccount:<namespace>:<name>`)
    #[serde(default)]
    pub users: Vec<String>,

    /// Volume plugin types permitted; `*` allows all
    #[serde(default)]
    pub volumes: Vec<String>,
}

/// Strategy applied to a constrained security attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    /// Strategy type
    #[serde(rename = "type", default)]
    pub strategy: AccessStrategy,
}

/// How strictly an attribute is constrained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum AccessStrategy {
    /// Any value is accepted
    #[default]
    RunAsAny,
    /// The value must fall in a pre-allocated range
    MustRunAs,
}
