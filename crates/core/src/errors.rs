use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Slot conflict: {0}")]
    SlotConflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Too late: {0}")]
    TooLate(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type CareResult<T> = Result<T, CareError>;
