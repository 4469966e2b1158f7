//! # Course Errors
//!
//! Error types for course validation and persistence.

use thiserror::Error;

/// Result type for course operations
pub type CourseResult<T> = Result<T, CourseError>;

/// Course operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    // ==================
    // Validation Errors
    // ==================
    /// A required field was missing or empty
    #[error("{0} is required")]
    FieldRequired(&'static str),

    /// Start date is not a valid YYYY-MM-DD date
    #[error("invalid start_date")]
    InvalidStartDate,

    /// End date is not a valid YYYY-MM-DD date
    #[error("invalid end_date")]
    InvalidEndDate,

    /// Start date falls after end date
    #[error("end_date must be after start_date")]
    EndDateNotAfterStart,

    /// Start date and end date are the same day
    #[error("start_date and end_date must not be equal")]
    EqualDates,

    // ==================
    // Lookup Errors
    // ==================
    /// No course with this id
    #[error("Course with ID -> '{0}' doesn't exist")]
    NotFound(String),

    // ==================
    // Storage Errors
    // ==================
    /// Underlying store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl CourseError {
    /// Whether this error was raised by request validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CourseError::FieldRequired(_)
                | CourseError::InvalidStartDate
                | CourseError::InvalidEndDate
                | CourseError::EndDateNotAfterStart
                | CourseError::EqualDates
        )
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            e if e.is_validation() => 400,
            CourseError::NotFound(_) => 404,
            _ => 500,
        }
    }
}
