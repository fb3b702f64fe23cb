// ABOUTME: Error types for deployment runs.
// ABOUTME: Covers configuration, packaging, conflict, readiness, and remote failures.

use crate::package::PackageError;
use crate::remote::RemoteError;
use crate::types::FunctionName;

/// Errors that abort a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The function has to be created but no execution role is configured.
    #[error("function {0} does not exist and no role is configured to create it")]
    MissingRole(FunctionName),

    /// The configuration could not be turned into a request.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Building the artifact failed.
    #[error("packaging failed: {0}")]
    Packaging(#[from] PackageError),

    /// The provider kept reporting an update in progress.
    #[error("{operation} still conflicting after {attempts} attempts: {message}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        message: String,
    },

    /// Polling found that the previous update of the function failed.
    #[error("previous update of {function} failed: {reason}")]
    PreviousUpdateFailed {
        function: FunctionName,
        reason: String,
    },

    /// The function did not become ready in time.
    #[error("{function} was not ready to update after {waited_secs} seconds")]
    ReadinessTimeout {
        function: FunctionName,
        waited_secs: u64,
    },

    /// Any other remote failure, propagated unchanged.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Configuration,
    Packaging,
    Conflict,
    PreviousUpdateFailed,
    Timeout,
    Remote,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::MissingRole(_) | DeployError::InvalidConfig(_) => {
                DeployErrorKind::Configuration
            }
            DeployError::Packaging(_) => DeployErrorKind::Packaging,
            DeployError::RetriesExhausted { .. } => DeployErrorKind::Conflict,
            DeployError::PreviousUpdateFailed { .. } => DeployErrorKind::PreviousUpdateFailed,
            DeployError::ReadinessTimeout { .. } => DeployErrorKind::Timeout,
            DeployError::Remote { .. } => DeployErrorKind::Remote,
        }
    }

    pub(crate) fn remote(operation: &'static str) -> impl FnOnce(RemoteError) -> Self {
        move |source| DeployError::Remote { operation, source }
    }
}
