//! NetworkAttachmentDefinition operand.

use crate::binding;
use crate::conditional::ConditionalOperand;
use crate::generic::GenericOperand;
use crate::hooks::OperandHooks;
use crate::labels;
use crate::store::ObjectStore;
use crds::{NetworkAttachmentDefinition, NetworkBindingConfig};

/// Conditional operand for the binding network-attachment definition.
pub fn new_network_attachment_definition_operand(
    store: Box<dyn ObjectStore<NetworkAttachmentDefinition>>,
) -> ConditionalOperand<NetworkAttachmentDefinitionHooks> {
    ConditionalOperand::new(
        GenericOperand::new(
            "NetworkAttachmentDefinition",
            NetworkAttachmentDefinitionHooks,
            store,
        ),
        binding::should_deploy_network_binding,
        binding::network_attachment_definition_identity,
    )
}

/// Hook set for the binding network-attachment definition.
#[derive(Debug)]
pub struct NetworkAttachmentDefinitionHooks;

impl OperandHooks for NetworkAttachmentDefinitionHooks {
    type Object = NetworkAttachmentDefinition;

    fn build(&self, config: &NetworkBindingConfig) -> NetworkAttachmentDefinition {
        binding::new_binding_network_attachment_definition(config)
    }

    // Drift policy for this kind: managed labels plus the CNI config
    // payload — everything merge writes is compared.
    fn matches(
        &self,
        existing: &NetworkAttachmentDefinition,
        desired: &NetworkAttachmentDefinition,
    ) -> bool {
        existing.spec == desired.spec
            && labels::labels_match(
                desired.metadata.labels.as_ref(),
                existing.metadata.labels.as_ref(),
            )
    }

    fn merge(
        &self,
        existing: &NetworkAttachmentDefinition,
        desired: &NetworkAttachmentDefinition,
    ) -> NetworkAttachmentDefinition {
        let mut next = existing.clone();
        next.metadata.labels = Some(labels::merge_labels(
            desired.metadata.labels.as_ref(),
            existing.metadata.labels.as_ref(),
        ));
        next.spec = desired.spec.clone();
        next
    }
}
