//! DaemonSet operand.

use crate::binding::{self, BindingPolicy};
use crate::generic::GenericOperand;
use crate::hooks::OperandHooks;
use crate::labels;
use crate::store::ObjectStore;
use crds::NetworkBindingConfig;
use k8s_openapi::api::apps::v1::DaemonSet;

/// Operand for the CNI installer daemon set.
pub fn new_daemon_set_operand(
    store: Box<dyn ObjectStore<DaemonSet>>,
    policy: BindingPolicy,
) -> GenericOperand<DaemonSetHooks> {
    GenericOperand::new("DaemonSet", DaemonSetHooks { policy }, store)
}

/// Hook set for the CNI installer daemon set.
#[derive(Debug)]
pub struct DaemonSetHooks {
    policy: BindingPolicy,
}

impl OperandHooks for DaemonSetHooks {
    type Object = DaemonSet;

    fn build(&self, config: &NetworkBindingConfig) -> DaemonSet {
        binding::new_binding_cni_daemon_set(config, &self.policy)
    }

    // Drift policy for this kind: managed labels plus full structural spec
    // equality. The pod template is entirely opinionated, so any spec change
    // is drift.
    fn matches(&self, existing: &DaemonSet, desired: &DaemonSet) -> bool {
        existing.spec == desired.spec
            && labels::labels_match(
                desired.metadata.labels.as_ref(),
                existing.metadata.labels.as_ref(),
            )
    }

    fn merge(&self, existing: &DaemonSet, desired: &DaemonSet) -> DaemonSet {
        let mut next = existing.clone();
        next.metadata.labels = Some(labels::merge_labels(
            desired.metadata.labels.as_ref(),
            existing.metadata.labels.as_ref(),
        ));
        next.spec = desired.spec.clone();
        next
    }
}
