//! SecurityConstraint operand.

use crate::binding;
use crate::conditional::ConditionalOperand;
use crate::generic::GenericOperand;
use crate::hooks::OperandHooks;
use crate::labels;
use crate::store::ObjectStore;
use crds::{NetworkBindingConfig, SecurityConstraint};

/// Conditional operand for the binding security constraint.
pub fn new_security_constraint_operand(
    store: Box<dyn ObjectStore<SecurityConstraint>>,
) -> ConditionalOperand<SecurityConstraintHooks> {
    ConditionalOperand::new(
        GenericOperand::new("SecurityConstraint", SecurityConstraintHooks, store),
        binding::should_deploy_network_binding,
        binding::security_constraint_identity,
    )
}

/// Hook set for the binding security constraint.
#[derive(Debug)]
pub struct SecurityConstraintHooks;

impl OperandHooks for SecurityConstraintHooks {
    type Object = SecurityConstraint;

    fn build(&self, config: &NetworkBindingConfig) -> SecurityConstraint {
        binding::new_binding_security_constraint(config)
    }

    // Drift policy for this kind: managed labels plus the policy fields —
    // everything merge writes is compared.
    fn matches(&self, existing: &SecurityConstraint, desired: &SecurityConstraint) -> bool {
        existing.spec == desired.spec
            && labels::labels_match(
                desired.metadata.labels.as_ref(),
                existing.metadata.labels.as_ref(),
            )
    }

    fn merge(&self, existing: &SecurityConstraint, desired: &SecurityConstraint) -> SecurityConstraint {
        let mut next = existing.clone();
        next.metadata.labels = Some(labels::merge_labels(
            desired.metadata.labels.as_ref(),
            existing.metadata.labels.as_ref(),
        ));
        next.spec = desired.spec.clone();
        next
    }
}
