use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for product catalog operations
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for ProductError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProductError::NotFound("Record not found".to_string()),
            _ => ProductError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for product operations
pub type Result<T> = std::result::Result<T, ProductError>;
