use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for prospect-related operations
#[derive(Debug, Error)]
pub enum ProspectError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for ProspectError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProspectError::NotFound("Record not found".to_string()),
            _ => ProspectError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for prospect operations
pub type Result<T> = std::result::Result<T, ProspectError>;
