//! Presence gating on top of the generic engine.

use crate::error::OperandError;
use crate::generic::GenericOperand;
use crate::hooks::{Operand, OperandHooks};
use crate::request::{EnsureResult, ReconcileRequest};
use crate::store::ObjectIdentity;
use async_trait::async_trait;
use crds::NetworkBindingConfig;

/// Deploys or removes an operand based on a predicate over the top-level
/// configuration.
///
/// When the predicate is false the delete-or-noop branch runs against a
/// cheap named-only identity, so the full desired object is never built —
/// removal stays possible even when the builder's inputs are unavailable.
pub struct ConditionalOperand<H: OperandHooks> {
    operand: GenericOperand<H>,
    should_deploy: fn(&NetworkBindingConfig) -> bool,
    identity: fn(&NetworkBindingConfig) -> ObjectIdentity,
}

impl<H: OperandHooks> ConditionalOperand<H> {
    /// Wraps a generic engine with a deploy predicate and a named-only
    /// identity factory.
    pub fn new(
        operand: GenericOperand<H>,
        should_deploy: fn(&NetworkBindingConfig) -> bool,
        identity: fn(&NetworkBindingConfig) -> ObjectIdentity,
    ) -> Self {
        Self {
            operand,
            should_deploy,
            identity,
        }
    }
}

#[async_trait]
impl<H: OperandHooks> Operand for ConditionalOperand<H> {
    fn kind(&self) -> &str {
        self.operand.kind()
    }

    async fn ensure(&self, req: &ReconcileRequest<'_>) -> Result<EnsureResult, OperandError> {
        if (self.should_deploy)(req.config) {
            self.operand.ensure_present(req).await
        } else {
            let id = (self.identity)(req.config);
            self.operand.ensure_absent(req, &id).await
        }
    }
}
