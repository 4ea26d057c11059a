//! NetBind CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the NetBind operator.

pub mod net_attach_def;
pub mod network_binding_config;
pub mod security_constraint;

pub use net_attach_def::*;
pub use network_binding_config::*;
pub use security_constraint::*;
