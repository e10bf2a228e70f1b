//! Errors that may be returned by this crate

use std::time::Duration;

/// Every failure this crate can surface.
///
/// Failures mostly originate in the remote [`KeepService`](crate::traits::KeepService) and are passed through unchanged.
/// Reconciliation itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service rejected the email/password or the master token
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A login succeeded, but the remote service did not hand out a master token
    #[error("no master token was issued")]
    MissingMasterToken,

    /// A call to the remote service was made before any login or resume
    #[error("not logged in")]
    NotAuthenticated,

    #[error("network error: {0}")]
    Network(String),

    #[error("inconsistent remote data: {0}")]
    Inconsistent(String),

    /// The remote service did not answer in time
    #[error("no answer from the remote service within {0:?}")]
    Timeout(Duration),

    /// The session has been torn down when its config entry was unloaded
    #[error("this session has been closed")]
    SessionClosed,

    /// A config entry could not be set up, the host may try again later
    #[error("config entry is not ready: {0}")]
    NotReady(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Updating a task requires to know which one
    #[error("cannot update a task that has no id")]
    MissingItemId,

    /// A blocking worker task panicked or was cancelled
    #[error("background worker failed: {0}")]
    Worker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the user has to enter their credentials again
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::InvalidCredentials)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Worker(err.to_string())
    }
}
