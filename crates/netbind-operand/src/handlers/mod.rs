//! Per-kind operand handlers.
//!
//! One hook set per managed resource kind, plus a constructor wiring it to
//! the engine. The service account, network-attachment definition, and
//! security constraint are gated on the deploy annotation; the daemon set is
//! registered unconditionally by the caller.

mod daemon_set;
mod net_attach_def;
mod security_constraint;
mod service_account;

pub use daemon_set::{DaemonSetHooks, new_daemon_set_operand};
pub use net_attach_def::{
    NetworkAttachmentDefinitionHooks, new_network_attachment_definition_operand,
};
pub use security_constraint::{SecurityConstraintHooks, new_security_constraint_operand};
pub use service_account::{ServiceAccountHooks, new_service_account_operand};
