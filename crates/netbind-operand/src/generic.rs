//! Generic reconciliation engine shared by all operand kinds.

use crate::error::OperandError;
use crate::hooks::{Operand, OperandHooks};
use crate::request::{EnsureResult, ReconcileRequest};
use crate::store::{ObjectIdentity, ObjectStore};
use async_trait::async_trait;
use kube::Resource;
use tracing::{debug, info};

/// Drives one resource kind toward its opinionated desired state.
///
/// Each instance is statically bound to one concrete kind through its hook
/// set, so a store read can never yield a value of the wrong type. One
/// `ensure` call performs a single fresh read and at most one write; failures
/// other than not-found surface verbatim and are never retried here.
pub struct GenericOperand<H: OperandHooks> {
    kind: &'static str,
    hooks: H,
    store: Box<dyn ObjectStore<H::Object>>,
}

impl<H: OperandHooks> GenericOperand<H> {
    /// Binds a hook set and a store into an engine for one kind.
    pub fn new(kind: &'static str, hooks: H, store: Box<dyn ObjectStore<H::Object>>) -> Self {
        Self { kind, hooks, store }
    }

    pub(crate) async fn ensure_present(
        &self,
        req: &ReconcileRequest<'_>,
    ) -> Result<EnsureResult, OperandError> {
        let desired = self.hooks.build(req.config);
        let name = desired.meta().name.clone().ok_or_else(|| {
            OperandError::InvalidDesiredState(format!("built {} has no name", self.kind))
        })?;
        let id = ObjectIdentity {
            namespace: desired.meta().namespace.clone(),
            name: name.clone(),
        };

        match self.store.get(&id).await {
            Ok(existing) => self.converge(req, &id, &existing, &desired).await,
            Err(err) if err.is_not_found() => {
                debug!("{} {} not found, creating it", self.kind, id);
                self.store.create(&desired).await?;
                info!("Created {} {}", self.kind, id);
                self.hooks.finalize(req);
                Ok(EnsureResult::created(name))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn converge(
        &self,
        req: &ReconcileRequest<'_>,
        id: &ObjectIdentity,
        existing: &H::Object,
        desired: &H::Object,
    ) -> Result<EnsureResult, OperandError> {
        if self.hooks.matches(existing, desired) {
            debug!("{} {} is already up to date", self.kind, id);
            self.hooks.finalize(req);
            return Ok(EnsureResult::noop(id.name.clone()));
        }

        if req.config_triggered {
            info!(
                "Updating existing {} {} to new opinionated values",
                self.kind, id
            );
        } else {
            info!(
                "Reconciling an externally updated {} {} to its opinionated values",
                self.kind, id
            );
        }
        let next = self.hooks.merge(existing, desired);
        self.store.update(&next).await?;
        self.hooks.finalize(req);
        Ok(EnsureResult::updated(id.name.clone(), !req.config_triggered))
    }

    /// Ensures the object named by `id` is absent. Used by the conditional
    /// wrapper so deletion never needs the full desired object.
    pub(crate) async fn ensure_absent(
        &self,
        req: &ReconcileRequest<'_>,
        id: &ObjectIdentity,
    ) -> Result<EnsureResult, OperandError> {
        match self.store.get(id).await {
            Ok(_) => {
                self.store.delete(id).await?;
                info!("Removed {} {}", self.kind, id);
                self.hooks.finalize(req);
                Ok(EnsureResult::deleted(id.name.clone()))
            }
            Err(err) if err.is_not_found() => {
                debug!("{} {} already absent", self.kind, id);
                self.hooks.finalize(req);
                Ok(EnsureResult::noop(id.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<H: OperandHooks> Operand for GenericOperand<H> {
    fn kind(&self) -> &str {
        self.kind
    }

    async fn ensure(&self, req: &ReconcileRequest<'_>) -> Result<EnsureResult, OperandError> {
        self.ensure_present(req).await
    }
}
