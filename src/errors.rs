// /src/errors.rs
//! Error types for reconciliation. Nothing in the engine panics on bad input;
//! contract violations and host failures surface here.
use crate::types::Key;
use thiserror::Error;

/// Failure reported by a [`HostAdapter`](crate::host::HostAdapter) callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError { message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Duplicate key '{key}' among the children of '{parent}'")]
    DuplicateKey { parent: Key, key: Key },

    #[error("Child '{key}' of '{parent}' has no node in the snapshot")]
    MissingNode { parent: Key, key: Key },

    #[error("Root key '{0}' is not present in the snapshot")]
    UnknownRoot(Key),

    #[error("Host adapter failed for '{key}': {source}")]
    Host {
        key: Key,
        #[source]
        source: HostError,
    },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ReconcileError {
    pub(crate) fn host(key: &Key, source: HostError) -> Self {
        ReconcileError::Host { key: key.clone(), source }
    }
}

pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;

#[cfg(feature = "python")]
impl From<ReconcileError> for pyo3::PyErr {
    fn from(err: ReconcileError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for HostError {
    fn from(err: pyo3::PyErr) -> Self {
        HostError::new(err.to_string())
    }
}
