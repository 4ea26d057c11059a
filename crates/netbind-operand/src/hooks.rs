//! Per-kind operand capability contract.

use crate::error::OperandError;
use crate::request::{EnsureResult, ReconcileRequest};
use async_trait::async_trait;
use crds::NetworkBindingConfig;

/// Capability set implemented once per managed resource kind.
///
/// Implementations are pure function sets with no hidden state: `build`
/// computes the opinionated desired value, `matches` detects drift, and
/// `merge` returns the next value for an existing object without mutating
/// either input. The engine drives these uniformly for every kind.
pub trait OperandHooks: Send + Sync {
    /// Concrete Kubernetes object kind this hook set manages.
    type Object: kube::Resource + Clone + Send + Sync;

    /// Computes the fully-specified desired object.
    ///
    /// Pure and deterministic; must not perform I/O and must not fail for a
    /// well-formed configuration.
    fn build(&self, config: &NetworkBindingConfig) -> Self::Object;

    /// True iff no reconciling write is needed.
    ///
    /// Comparison must stay scoped to the fields this engine owns. Fields
    /// owned by other actors (status, defaulted fields, unrelated
    /// annotations) would cause update storms if compared.
    fn matches(&self, existing: &Self::Object, desired: &Self::Object) -> bool;

    /// Returns the next value for `existing`'s identity: managed labels
    /// recomputed via union-merge, spec-bearing managed fields copied from
    /// `desired`, everything else carried over from `existing`.
    fn merge(&self, existing: &Self::Object, desired: &Self::Object) -> Self::Object;

    /// Invoked after a successful branch, for side effects outside the
    /// managed resource itself. Reserved; no managed kind currently needs
    /// it.
    fn finalize(&self, _req: &ReconcileRequest<'_>) {}
}

/// A managed operand that can be driven to its desired state.
#[async_trait]
pub trait Operand: Send + Sync {
    /// Kind name, used in logs.
    fn kind(&self) -> &str;

    /// Performs one reconcile pass: at most one read and at most one write
    /// against the object store.
    async fn ensure(&self, req: &ReconcileRequest<'_>) -> Result<EnsureResult, OperandError>;
}
