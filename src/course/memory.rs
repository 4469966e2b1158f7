//! In-memory course repository.
//!
//! Used when no database is configured and throughout the test suite.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::domain::{Course, CourseChanges, NewCourse};
use super::filter::Filters;
use super::repository::{CourseRepository, RepositoryError, RepositoryResult};

/// Courses kept in insertion order behind a lock
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<Vec<Course>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<T>(_: T) -> RepositoryError {
        RepositoryError::Storage("Lock poisoned".to_string())
    }

    /// Matching courses, newest first. Ties on `created_at` fall back to
    /// reverse insertion order.
    fn matching(&self, filters: &Filters) -> RepositoryResult<Vec<Course>> {
        let courses = self.courses.read().map_err(Self::poisoned)?;

        let mut matching: Vec<Course> = courses
            .iter()
            .rev()
            .filter(|c| filters.matches(c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching)
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, course: NewCourse) -> RepositoryResult<Course> {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4().to_string(),
            name: course.name,
            start_date: course.start_date,
            end_date: course.end_date,
            created_at: now,
            updated_at: now,
        };

        self.courses
            .write()
            .map_err(Self::poisoned)?
            .push(course.clone());

        debug!(id = %course.id, "course stored");
        Ok(course)
    }

    async fn get(&self, id: &str) -> RepositoryResult<Course> {
        let courses = self.courses.read().map_err(Self::poisoned)?;

        courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        Ok(self
            .matching(filters)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self, filters: &Filters) -> RepositoryResult<usize> {
        let courses = self.courses.read().map_err(Self::poisoned)?;
        Ok(courses.iter().filter(|c| filters.matches(c)).count())
    }

    async fn update(&self, id: &str, changes: &CourseChanges) -> RepositoryResult<()> {
        let mut courses = self.courses.write().map_err(Self::poisoned)?;

        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        changes.apply_to(course, Utc::now());
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut courses = self.courses.write().map_err(Self::poisoned)?;

        let before = courses.len();
        courses.retain(|c| c.id != id);

        if courses.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        debug!(id, "course removed");
        Ok(())
    }
}
