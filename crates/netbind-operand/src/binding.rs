//! Desired-state builders for the network binding operands.
//!
//! Everything here is a pure function of the top-level configuration plus
//! the static [`BindingPolicy`] resolved once at process start. Builders
//! never perform I/O.

use crate::error::OperandError;
use crate::labels::{self, AppComponent};
use crate::store::ObjectIdentity;
use crds::{
    AccessStrategy, NetworkAttachmentDefinition, NetworkAttachmentDefinitionSpec,
    NetworkBindingConfig, SecurityConstraint, SecurityConstraintSpec, StrategyOptions,
};
use k8s_openapi::api::apps::v1::{
    DaemonSet, DaemonSetSpec, DaemonSetUpdateStrategy, RollingUpdateDaemonSet,
};
use k8s_openapi::api::core::v1::{
    Affinity, Container, HostPathVolumeSource, PodAffinityTerm, PodAntiAffinity, PodSpec,
    PodTemplateSpec, ResourceRequirements, SecurityContext, ServiceAccount, Volume, VolumeMount,
    WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, LabelSelectorRequirement, ObjectMeta,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;
use std::env;

/// Annotation on the top-level configuration gating the network binding
/// operands. Deployment happens only when the value is exactly `"true"`.
pub const DEPLOY_NETWORK_BINDING_ANNOTATION: &str = "deployNetworkBinding";

/// Application name carried on every managed object
pub const BINDING_APP_NAME: &str = "netbind";

/// Name shared by the service account, daemon set, and security constraint
pub const BINDING_CNI_NAME: &str = "binding-cni";

const NAD_NAME: &str = "primary-network-binding";
const NAD_NAMESPACE: &str = "default";

/// `namespace/name` reference to the network-attachment definition, as
/// consumers of the binding wire it
pub const NETWORK_ATTACHMENT_DEFINITION: &str = "default/primary-network-binding";

const CNI_IMAGE_ENV: &str = "NETBIND_CNI_IMAGE";
const SIDECAR_IMAGE_ENV: &str = "NETBIND_SIDECAR_IMAGE";

const SIDECAR_MEMORY_OVERHEAD: &str = "500Mi";

const BINDING_CNI_CONFIG: &str = r#"{
  "cniVersion": "1.0.0",
  "name": "primary-network-binding",
  "plugins": [
    {
      "type": "netbind-binding"
    }
  ]
}"#;

/// Container image references used by the binding operands, resolved from
/// the environment once at process start and passed by reference into the
/// builders.
#[derive(Debug, Clone)]
pub struct BindingImages {
    /// Image installing the CNI plugin on every node
    pub cni_image: String,
    /// Sidecar image injected next to workloads using the binding
    pub sidecar_image: String,
}

impl BindingImages {
    /// Resolves the image references from the environment.
    pub fn from_env() -> Result<Self, OperandError> {
        let cni_image = env::var(CNI_IMAGE_ENV).map_err(|_| {
            OperandError::InvalidConfig(format!(
                "the {CNI_IMAGE_ENV} environment variable must be set"
            ))
        })?;
        let sidecar_image = env::var(SIDECAR_IMAGE_ENV).map_err(|_| {
            OperandError::InvalidConfig(format!(
                "the {SIDECAR_IMAGE_ENV} environment variable must be set"
            ))
        })?;
        Ok(Self {
            cni_image,
            sidecar_image,
        })
    }
}

/// Cluster variant the operands are deployed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterFlavor {
    /// Vanilla Kubernetes
    #[default]
    Kubernetes,
    /// OpenShift (CNI binaries live under a different host path)
    OpenShift,
}

impl ClusterFlavor {
    fn cni_bin_dir(self) -> &'static str {
        match self {
            ClusterFlavor::Kubernetes => "/opt/cni/bin",
            ClusterFlavor::OpenShift => "/var/lib/cni/bin",
        }
    }
}

/// Static build policy: resolved images plus platform facts that do not
/// vary per reconcile pass.
#[derive(Debug, Clone)]
pub struct BindingPolicy {
    /// Resolved image references
    pub images: BindingImages,
    /// Cluster variant
    pub flavor: ClusterFlavor,
    /// Whether the infrastructure has enough nodes to spread pods
    pub infrastructure_highly_available: bool,
}

/// True when the deploy-gate annotation on the configuration is `"true"`.
pub fn should_deploy_network_binding(config: &NetworkBindingConfig) -> bool {
    config
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(DEPLOY_NETWORK_BINDING_ANNOTATION))
        .is_some_and(|value| value == "true")
}

/// Identity of the binding CNI service account.
pub fn service_account_identity(config: &NetworkBindingConfig) -> ObjectIdentity {
    ObjectIdentity {
        namespace: config.metadata.namespace.clone(),
        name: BINDING_CNI_NAME.to_string(),
    }
}

/// Identity of the network-attachment definition.
pub fn network_attachment_definition_identity(_config: &NetworkBindingConfig) -> ObjectIdentity {
    ObjectIdentity::namespaced(NAD_NAMESPACE, NAD_NAME)
}

/// Identity of the cluster security constraint.
pub fn security_constraint_identity(_config: &NetworkBindingConfig) -> ObjectIdentity {
    ObjectIdentity::cluster(BINDING_CNI_NAME)
}

/// Builds the service account the CNI installer pods run as.
pub fn new_binding_cni_service_account(config: &NetworkBindingConfig) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(BINDING_CNI_NAME.to_string()),
            namespace: config.metadata.namespace.clone(),
            labels: Some(labels::canonical_labels(
                BINDING_APP_NAME,
                AppComponent::Network,
            )),
            ..ObjectMeta::default()
        },
        ..ServiceAccount::default()
    }
}

/// Builds the daemon set installing the binding CNI plugin on every node.
pub fn new_binding_cni_daemon_set(
    config: &NetworkBindingConfig,
    policy: &BindingPolicy,
) -> DaemonSet {
    let mut ds_labels = labels::canonical_labels(BINDING_APP_NAME, AppComponent::Network);
    ds_labels.insert("tier".to_string(), "node".to_string());

    let placement = config.spec.infra.node_placement.as_ref();
    let node_selector = placement.and_then(|p| p.node_selector.clone());
    let affinity = placement
        .and_then(|p| p.affinity.clone())
        .or_else(|| binding_cni_anti_affinity(policy.infrastructure_highly_available));
    let tolerations = placement.and_then(|p| p.tolerations.clone());

    // The container always mounts the host CNI directory at /opt/cni/bin;
    // only the host-side path varies per flavor.
    let install_script = r#"ls -la "/cni/netbind-binding"
cp -f "/cni/netbind-binding" "/opt/cni/bin"
echo "network binding CNI plugin installed, sleeping"
sleep 2147483647"#
        .to_string();

    DaemonSet {
        metadata: ObjectMeta {
            name: Some(BINDING_CNI_NAME.to_string()),
            namespace: config.metadata.namespace.clone(),
            labels: Some(ds_labels),
            ..ObjectMeta::default()
        },
        spec: Some(DaemonSetSpec {
            selector: LabelSelector {
                match_labels: Some(BTreeMap::from([(
                    "name".to_string(),
                    BINDING_CNI_NAME.to_string(),
                )])),
                ..LabelSelector::default()
            },
            update_strategy: Some(DaemonSetUpdateStrategy {
                type_: Some("RollingUpdate".to_string()),
                rolling_update: Some(RollingUpdateDaemonSet {
                    max_unavailable: Some(IntOrString::String("10%".to_string())),
                    ..RollingUpdateDaemonSet::default()
                }),
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(BTreeMap::from([
                        ("name".to_string(), BINDING_CNI_NAME.to_string()),
                        ("tier".to_string(), "node".to_string()),
                        ("app".to_string(), BINDING_CNI_NAME.to_string()),
                    ])),
                    annotations: Some(BTreeMap::from([(
                        "description".to_string(),
                        "binding-cni installs the network binding CNI plugin on cluster nodes"
                            .to_string(),
                    )])),
                    ..ObjectMeta::default()
                }),
                spec: Some(PodSpec {
                    priority_class_name: Some("system-cluster-critical".to_string()),
                    service_account_name: Some(BINDING_CNI_NAME.to_string()),
                    node_selector,
                    affinity,
                    tolerations,
                    containers: vec![Container {
                        name: "installer".to_string(),
                        image: Some(policy.images.cni_image.clone()),
                        command: Some(vec!["/bin/sh".to_string(), "-ce".to_string()]),
                        args: Some(vec![install_script]),
                        resources: Some(ResourceRequirements {
                            requests: Some(BTreeMap::from([
                                ("cpu".to_string(), Quantity("10m".to_string())),
                                ("memory".to_string(), Quantity("15Mi".to_string())),
                            ])),
                            ..ResourceRequirements::default()
                        }),
                        security_context: Some(SecurityContext {
                            privileged: Some(true),
                            ..SecurityContext::default()
                        }),
                        volume_mounts: Some(vec![VolumeMount {
                            name: "cnibin".to_string(),
                            mount_path: "/opt/cni/bin".to_string(),
                            ..VolumeMount::default()
                        }]),
                        image_pull_policy: Some("IfNotPresent".to_string()),
                        ..Container::default()
                    }],
                    volumes: Some(vec![Volume {
                        name: "cnibin".to_string(),
                        host_path: Some(HostPathVolumeSource {
                            path: policy.flavor.cni_bin_dir().to_string(),
                            ..HostPathVolumeSource::default()
                        }),
                        ..Volume::default()
                    }]),
                    ..PodSpec::default()
                }),
            },
            ..DaemonSetSpec::default()
        }),
        ..DaemonSet::default()
    }
}

/// Builds the network-attachment definition consumers attach to.
pub fn new_binding_network_attachment_definition(
    _config: &NetworkBindingConfig,
) -> NetworkAttachmentDefinition {
    NetworkAttachmentDefinition {
        metadata: ObjectMeta {
            name: Some(NAD_NAME.to_string()),
            namespace: Some(NAD_NAMESPACE.to_string()),
            labels: Some(labels::canonical_labels(
                BINDING_APP_NAME,
                AppComponent::Network,
            )),
            ..ObjectMeta::default()
        },
        spec: NetworkAttachmentDefinitionSpec {
            config: Some(BINDING_CNI_CONFIG.to_string()),
        },
    }
}

/// Builds the cluster security constraint granting the installer its
/// privileged rights.
pub fn new_binding_security_constraint(config: &NetworkBindingConfig) -> SecurityConstraint {
    let namespace = config.metadata.namespace.as_deref().unwrap_or("default");
    SecurityConstraint {
        metadata: ObjectMeta {
            name: Some(BINDING_CNI_NAME.to_string()),
            labels: Some(labels::canonical_labels(
                BINDING_APP_NAME,
                AppComponent::Network,
            )),
            ..ObjectMeta::default()
        },
        spec: SecurityConstraintSpec {
            allow_privileged_container: true,
            allow_host_dir_volume_plugin: true,
            allow_host_ipc: false,
            allow_host_network: false,
            allow_host_pid: false,
            allow_host_ports: false,
            read_only_root_filesystem: false,
            run_as_user: StrategyOptions {
                strategy: AccessStrategy::RunAsAny,
            },
            se_linux_context: StrategyOptions {
                strategy: AccessStrategy::RunAsAny,
            },
            users: vec![format!(
                "system:serviceaccount:{namespace}:{BINDING_CNI_NAME}"
            )],
            volumes: vec!["*".to_string()],
        },
    }
}

/// Interface binding plugin registration handed to consumers of the
/// binding: the attachment reference, the sidecar image, and the compute
/// overhead the sidecar adds to each workload.
pub fn network_binding_plugin(images: &BindingImages) -> serde_json::Value {
    serde_json::json!({
        "networkAttachmentDefinition": NETWORK_ATTACHMENT_DEFINITION,
        "sidecarImage": images.sidecar_image,
        "migration": {},
        "computeResourceOverhead": {
            "requests": {
                "memory": SIDECAR_MEMORY_OVERHEAD
            }
        }
    })
}

fn binding_cni_anti_affinity(infrastructure_highly_available: bool) -> Option<Affinity> {
    if !infrastructure_highly_available {
        return None;
    }
    Some(Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![
                WeightedPodAffinityTerm {
                    weight: 90,
                    pod_affinity_term: PodAffinityTerm {
                        label_selector: Some(LabelSelector {
                            match_expressions: Some(vec![LabelSelectorRequirement {
                                key: labels::APP_COMPONENT_LABEL.to_string(),
                                operator: "In".to_string(),
                                values: Some(vec![AppComponent::Network.as_str().to_string()]),
                            }]),
                            ..LabelSelector::default()
                        }),
                        topology_key: "kubernetes.io/hostname".to_string(),
                        ..PodAffinityTerm::default()
                    },
                },
            ]),
            ..PodAntiAffinity::default()
        }),
        ..Affinity::default()
    })
}
