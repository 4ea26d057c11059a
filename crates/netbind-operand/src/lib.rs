//! NetBind Operand Engine
//!
//! Keeps the auxiliary cluster resources of the network binding feature (a
//! service account, the CNI installer daemon set, a network-attachment
//! definition, and a cluster security constraint) in lock-step with a single
//! [`crds::NetworkBindingConfig`].
//!
//! The core is [`GenericOperand`], a per-kind "ensure this resource matches
//! its opinionated desired state" state machine that performs at most one
//! read and one write per pass, repairs drift on the fields it owns, and
//! leaves everything else untouched. [`ConditionalOperand`] layers
//! create-vs-delete gating on top, driven by an annotation on the
//! configuration.
//!
//! Scheduling, watching, and retry/backoff belong to the calling controller;
//! this crate only exposes the [`Operand::ensure`] entry point.

pub mod binding;
pub mod conditional;
pub mod error;
pub mod generic;
pub mod handlers;
pub mod hooks;
pub mod labels;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod request;
pub mod store;

pub use binding::{BindingImages, BindingPolicy, ClusterFlavor};
pub use conditional::ConditionalOperand;
pub use error::{OperandError, StoreError};
pub use generic::GenericOperand;
pub use hooks::{Operand, OperandHooks};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockStore;
pub use request::{EnsureResult, ReconcileRequest};
pub use store::{ClusterKubeStore, NamespacedKubeStore, ObjectIdentity, ObjectStore};

mod conditional_test;
mod generic_test;
