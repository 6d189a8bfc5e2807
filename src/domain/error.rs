use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    Association(String),
    #[error("{0}")]
    ReferenceConflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure signals reported by every repository implementation.
///
/// Services match on these instead of on any storage engine's own error codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),
    #[error("record not found")]
    NotFound,
    #[error("associated {entity} '{key}' does not exist")]
    MissingAssociation { entity: &'static str, key: String },
    #[error("record is still referenced by other records")]
    Restricted,
    #[error("storage backend failure: {0}")]
    Backend(String),
}
