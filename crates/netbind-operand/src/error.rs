//! Operand engine error types.

use thiserror::Error;

/// Errors surfaced by the abstract object store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist in the store
    #[error("not found: {0}")]
    NotFound(String),

    /// Optimistic concurrency failure: the stored version changed since it
    /// was read
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store rejected or failed the call
    #[error("store API error: {0}")]
    Api(String),

    /// Kubernetes client error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),
}

impl StoreError {
    /// True when the error signals an absent object rather than a failed
    /// call.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Kube(kube::Error::Api(response)) => response.code == 404,
            _ => false,
        }
    }

    pub(crate) fn from_kube(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 404 => {
                StoreError::NotFound(response.message)
            }
            kube::Error::Api(response) if response.code == 409 => {
                StoreError::Conflict(response.message)
            }
            other => StoreError::Kube(other),
        }
    }
}

/// Errors that can occur while ensuring an operand.
#[derive(Debug, Error)]
pub enum OperandError {
    /// Object store operation failed
    #[error("object store error: {0}")]
    Store(#[from] StoreError),

    /// A builder produced a structurally unusable desired object
    #[error("invalid desired state: {0}")]
    InvalidDesiredState(String),

    /// Required configuration missing or malformed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
