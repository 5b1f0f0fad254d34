//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).
//! Every kind carries a stable machine-readable code (see [`DomainError::code`]).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid email")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid id")]
    InvalidId,

    #[error("invalid limit")]
    InvalidLimit,

    #[error("invalid offset")]
    InvalidOffset,

    #[error("invalid update input: at least one field must be provided for update")]
    InvalidUpdateInput,

    #[error("not found")]
    NotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("id already exists")]
    DuplicateId,

    #[error("email already exists")]
    DuplicateEmail,

    /// Input rejected by a storage constraint (not-null, check, foreign key, format)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    /// Deadline elapsed before the operation completed
    #[error("operation cancelled")]
    Cancelled,

    /// Unclassified storage failure, message passed through unchanged
    #[error("{0}")]
    Storage(String),
}

impl DomainError {
    /// Stable error code for clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidEmail => "E001",
            DomainError::InvalidName => "E002",
            DomainError::InvalidPassword => "E003",
            DomainError::InvalidId => "E004",
            DomainError::InvalidLimit => "E005",
            DomainError::InvalidOffset => "E006",
            DomainError::InvalidUpdateInput => "E007",
            DomainError::NotFound => "E008",
            DomainError::UserNotFound => "E009",
            DomainError::UserAlreadyExists => "E010",
            DomainError::DuplicateId => "E011",
            DomainError::DuplicateEmail => "E012",
            DomainError::InvalidInput(_) => "E013",
            DomainError::InvalidCredentials => "E014",
            DomainError::HashingFailure(_) => "E015",
            DomainError::Cancelled => "E016",
            DomainError::Storage(_) => "E017",
        }
    }

    /// Record (or user) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound | DomainError::UserNotFound)
    }

    /// Uniqueness conflict on id or email, whichever layer detected it.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            DomainError::UserAlreadyExists | DomainError::DuplicateId | DomainError::DuplicateEmail
        )
    }

    /// Caller supplied input that failed validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidEmail
                | DomainError::InvalidName
                | DomainError::InvalidPassword
                | DomainError::InvalidId
                | DomainError::InvalidLimit
                | DomainError::InvalidOffset
                | DomainError::InvalidUpdateInput
                | DomainError::InvalidInput(_)
        )
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        DomainError::InvalidInput(msg.into())
    }

    /// Create a hashing failure error
    pub fn hashing(msg: impl Into<String>) -> Self {
        DomainError::HashingFailure(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        DomainError::Storage(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
