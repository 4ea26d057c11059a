//! ServiceAccount operand.

use crate::binding;
use crate::conditional::ConditionalOperand;
use crate::generic::GenericOperand;
use crate::hooks::OperandHooks;
use crate::labels;
use crate::store::ObjectStore;
use crds::NetworkBindingConfig;
use k8s_openapi::api::core::v1::ServiceAccount;

/// Conditional operand for the binding CNI service account.
pub fn new_service_account_operand(
    store: Box<dyn ObjectStore<ServiceAccount>>,
) -> ConditionalOperand<ServiceAccountHooks> {
    ConditionalOperand::new(
        GenericOperand::new("ServiceAccount", ServiceAccountHooks, store),
        binding::should_deploy_network_binding,
        binding::service_account_identity,
    )
}

/// Hook set for the binding CNI service account.
#[derive(Debug)]
pub struct ServiceAccountHooks;

impl OperandHooks for ServiceAccountHooks {
    type Object = ServiceAccount;

    fn build(&self, config: &NetworkBindingConfig) -> ServiceAccount {
        binding::new_binding_cni_service_account(config)
    }

    // A service account carries no spec; the managed surface is its labels.
    fn matches(&self, existing: &ServiceAccount, desired: &ServiceAccount) -> bool {
        labels::labels_match(
            desired.metadata.labels.as_ref(),
            existing.metadata.labels.as_ref(),
        )
    }

    fn merge(&self, existing: &ServiceAccount, desired: &ServiceAccount) -> ServiceAccount {
        let mut next = existing.clone();
        next.metadata.labels = Some(labels::merge_labels(
            desired.metadata.labels.as_ref(),
            existing.metadata.labels.as_ref(),
        ));
        next
    }
}
