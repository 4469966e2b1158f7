//! # Course Repository
//!
//! Narrow persistence interface used by [`CourseService`](super::CourseService).
//! Implementations decide how records are stored; the service only relies on
//! the contract documented on each method.

use async_trait::async_trait;
use thiserror::Error;

use super::domain::{Course, CourseChanges, NewCourse};
use super::errors::CourseError;
use super::filter::Filters;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record with this id (zero rows affected or found)
    #[error("Course with ID -> '{0}' doesn't exist")]
    NotFound(String),

    /// Backend failure not tied to a driver error
    #[error("{0}")]
    Storage(String),

    /// Database driver failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for CourseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => CourseError::NotFound(id),
            other => CourseError::Storage(other.to_string()),
        }
    }
}

/// Course persistence operations
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a course and return it with its assigned id and timestamps
    async fn create(&self, course: NewCourse) -> RepositoryResult<Course>;

    /// Fetch a course by id
    async fn get(&self, id: &str) -> RepositoryResult<Course>;

    /// Courses matching `filters`, newest first, skipping `offset` and
    /// returning at most `limit`
    async fn list(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>>;

    /// Number of courses matching `filters`
    async fn count(&self, filters: &Filters) -> RepositoryResult<usize>;

    /// Write only the fields set in `changes`. Fails with `NotFound` when no
    /// row was affected.
    async fn update(&self, id: &str, changes: &CourseChanges) -> RepositoryResult<()>;

    /// Delete a course. Fails with `NotFound` when no row was affected.
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let not_found: CourseError = RepositoryError::NotFound("42".to_string()).into();
        assert_eq!(not_found, CourseError::NotFound("42".to_string()));

        let storage: CourseError = RepositoryError::Storage("Lock poisoned".to_string()).into();
        assert_eq!(storage, CourseError::Storage("Lock poisoned".to_string()));

        let db: CourseError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(db, CourseError::Storage(_)));
    }
}
