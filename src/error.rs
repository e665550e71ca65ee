//! Error types for the Garderobe core

use chrono::NaiveDate;
use thiserror::Error;

/// Stable numeric error codes surfaced to the UI layer for dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    BadPeriod = 2,
    NotAvailable = 3,
    NoSuchRecord = 4,
    AlreadyReturned = 5,
    BadTransition = 6,
    NotAuthorized = 7,
    BadValue = 8,
    Duplicate = 9,
    StoreFailure = 10,
    BadRow = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid rental period: return date {end} is before start date {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Costume {costume_id} size {size} is not available from {start} to {end}")]
    Unavailable {
        costume_id: String,
        size: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rental {0} has already been returned")]
    AlreadyReturned(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Malformed row: {0}")]
    Parse(String),
}

impl AppError {
    /// Numeric code for the UI layer
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidPeriod { .. } => ErrorCode::BadPeriod,
            AppError::Unavailable { .. } => ErrorCode::NotAvailable,
            AppError::NotFound(_) => ErrorCode::NoSuchRecord,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::InvalidState(_) => ErrorCode::BadTransition,
            AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Persistence(_) => ErrorCode::StoreFailure,
            AppError::Parse(_) => ErrorCode::BadRow,
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => AppError::Persistence(io),
            other => AppError::Parse(format!("{:?}", other)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
