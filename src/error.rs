//! Error types returned by the pod view pipeline.

use thiserror::Error;

/// Boxed error produced by a [`ListApi`](crate::ListApi) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while resolving the pods of a deployment.
#[derive(Debug, Error)]
pub enum Error {
    /// A required string argument was empty
    #[error("given string argument cannot be empty: {0}")]
    EmptyArgument(&'static str),

    /// The phase filter is not one of Running, Pending or Failed
    #[error("invalid pod phase {0:?}, expected one of Running, Pending, Failed")]
    InvalidPhase(String),

    #[error("no deployment found with name {name:?}")]
    DeploymentNotFound { name: String },

    #[error("no active replicaset found for deployment {namespace}/{deployment}")]
    ReplicaSetNotFound {
        deployment: String,
        namespace: String,
    },

    #[error("no pods found for replicaset {namespace}/{replica_set}")]
    PodsNotFound {
        replica_set: String,
        namespace: String,
    },

    /// The Kubernetes API call itself failed
    #[error("kubernetes API error: {0}")]
    Upstream(#[source] BoxError),

    /// The cancellation token fired or the operation deadline passed
    #[error("operation cancelled")]
    Cancelled,
}

/// Fieldless discriminant of [`Error`], for comparing errors by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyArgument,
    InvalidPhase,
    DeploymentNotFound,
    ReplicaSetNotFound,
    PodsNotFound,
    Upstream,
    Cancelled,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyArgument(_) => ErrorKind::EmptyArgument,
            Self::InvalidPhase(_) => ErrorKind::InvalidPhase,
            Self::DeploymentNotFound { .. } => ErrorKind::DeploymentNotFound,
            Self::ReplicaSetNotFound { .. } => ErrorKind::ReplicaSetNotFound,
            Self::PodsNotFound { .. } => ErrorKind::PodsNotFound,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}
