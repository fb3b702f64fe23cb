// ABOUTME: Error taxonomy for remote function API calls.
// ABOUTME: Separates "not found" and "conflict" signals from every other failure.

use thiserror::Error;

/// Failure of a single remote call.
///
/// `NotFound` and `Conflict` are signals the reconciliation engine branches
/// on; everything else is carried as `Other` with the provider's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Other(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    NotFound,
    Conflict,
    Other,
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::NotFound(_) => RemoteErrorKind::NotFound,
            RemoteError::Conflict(_) => RemoteErrorKind::Conflict,
            RemoteError::Other(_) => RemoteErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == RemoteErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == RemoteErrorKind::Conflict
    }

    /// Map a provider error code onto the taxonomy.
    pub fn from_code(code: Option<&str>, message: String) -> Self {
        match code {
            Some("ResourceNotFoundException") => RemoteError::NotFound(message),
            Some("ResourceConflictException") => RemoteError::Conflict(message),
            _ => RemoteError::Other(message),
        }
    }
}
