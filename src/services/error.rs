use thiserror::Error;

use crate::services::repository::RepositoryError;

/// Error taxonomy of the credential core.
///
/// Business outcomes (`UserExists`, `InvalidCredentials`, `AccountDisabled`,
/// `NotFound`, token rejections) are expected traffic and are returned, not
/// thrown; only `Repository` and `Internal` are infrastructure faults.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("User not found")]
    NotFound,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Validation error: {0}")]
    Validation(String),

    // Infrastructure faults display generically; the backend detail stays on
    // the source chain for logging and never reaches callers.
    #[error("Repository error")]
    Repository(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Whether this is an expected business outcome rather than a fault.
    /// Business outcomes are never logged at error level.
    pub fn is_business(&self) -> bool {
        !matches!(
            self,
            ServiceError::Repository(_) | ServiceError::Internal(_)
        )
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // The repository's unique constraint is the authoritative
            // uniqueness guarantee; surface it as the business outcome.
            RepositoryError::DuplicateEmail(_) => ServiceError::UserExists,
            RepositoryError::Backend(e) => ServiceError::Repository(e),
        }
    }
}
