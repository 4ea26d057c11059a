//! Reconcile request and result types.

use crds::NetworkBindingConfig;

/// One reconcile pass over a managed operand.
///
/// Borrows the top-level configuration for the duration of the pass; the
/// engine only reads it. Cancellation is structural: dropping the in-flight
/// `ensure` future aborts the store round trip.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    /// The top-level configuration driving this pass
    pub config: &'a NetworkBindingConfig,
    /// True when the pass was initiated by a change to the configuration's
    /// own spec; false when it was initiated by drift observed in a managed
    /// resource
    pub config_triggered: bool,
}

impl<'a> ReconcileRequest<'a> {
    /// Pass initiated by a change to the top-level configuration.
    pub fn config_change(config: &'a NetworkBindingConfig) -> Self {
        Self {
            config,
            config_triggered: true,
        }
    }

    /// Pass initiated by drift observed in a managed resource.
    pub fn drift(config: &'a NetworkBindingConfig) -> Self {
        Self {
            config,
            config_triggered: false,
        }
    }
}

/// Outcome of a single ensure call.
///
/// At most one of `created`, `updated`, `deleted` is set per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureResult {
    /// Name of the managed object this pass acted on
    pub name: String,
    /// The object was created
    pub created: bool,
    /// The object was updated
    pub updated: bool,
    /// The object was deleted
    pub deleted: bool,
    /// Advisory for the caller: prefer re-validation on the next pass.
    /// Set when a drift-triggered update may have raced an external writer;
    /// a self-triggered write already reflects the latest declared intent.
    pub requeue: bool,
}

impl EnsureResult {
    /// No write was needed.
    pub fn noop(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The object was created.
    pub fn created(name: impl Into<String>) -> Self {
        Self {
            created: true,
            ..Self::noop(name)
        }
    }

    /// The object was updated; `requeue` advises re-validation.
    pub fn updated(name: impl Into<String>, requeue: bool) -> Self {
        Self {
            updated: true,
            requeue,
            ..Self::noop(name)
        }
    }

    /// The object was deleted.
    pub fn deleted(name: impl Into<String>) -> Self {
        Self {
            deleted: true,
            ..Self::noop(name)
        }
    }
}
