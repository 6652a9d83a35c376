use thiserror::Error;

use crate::models::RequestStatus;

/// Errors reported by record store operations.
///
/// Persistence failures are deliberately absent: a failed snapshot
/// write is logged and swallowed, and the operation still reports
/// success to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already exists!")]
    DuplicateEmail,

    #[error("No pending verification found")]
    NoPendingVerification,

    #[error("Invalid email/password or account not verified")]
    InvalidCredentials,

    #[error("Please login to access this page")]
    NotAuthenticated,

    #[error("Access denied. Admin privileges required.")]
    NotAdmin,

    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Please fill in all item fields")]
    NoItems,

    #[error("Please select a request type")]
    MissingType,

    #[error("Request already {status}")]
    AlreadyResolved { status: RequestStatus },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: u32) -> Self {
        StoreError::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
