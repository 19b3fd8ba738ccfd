use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::clients::ClientError;
use crate::products::ProductError;
use crate::prospects::ProspectError;

/// Custom error type for quote operations
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Not found: {0}")]
    NotFound(String),
    /// Business-rule violation: bad counterparty references, foreign line
    /// ownership and the like. Client-correctable, never retried.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// Quote number conflicts are surfaced apart from other invalid
    /// operations so callers can prompt for a different number.
    #[error("Duplicate quote number: {0}")]
    DuplicateNumber(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for QuoteError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => QuoteError::NotFound("Record not found".to_string()),
            _ => QuoteError::DatabaseError(err.to_string()),
        }
    }
}

impl From<ClientError> for QuoteError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(msg) => QuoteError::NotFound(msg),
            other => QuoteError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ProspectError> for QuoteError {
    fn from(err: ProspectError) -> Self {
        match err {
            ProspectError::NotFound(msg) => QuoteError::NotFound(msg),
            other => QuoteError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ProductError> for QuoteError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(msg) => QuoteError::NotFound(msg),
            other => QuoteError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;
