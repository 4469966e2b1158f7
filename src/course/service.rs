//! # Course Service
//!
//! Validation and partial-update rules for courses. Every check runs before
//! the repository is asked to write anything, so a rejected request leaves
//! the store untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use super::domain::{Course, CourseChanges, CreateCourse, NewCourse, UpdateCourse, DATE_FORMAT};
use super::errors::{CourseError, CourseResult};
use super::filter::Filters;
use super::repository::CourseRepository;

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    // chrono accepts single-digit months and days; the wire format does not
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Start must fall strictly before end
fn check_order(start: NaiveDate, end: NaiveDate) -> CourseResult<()> {
    if start > end {
        return Err(CourseError::EndDateNotAfterStart);
    }
    if start == end {
        return Err(CourseError::EqualDates);
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> CourseResult<()> {
    if value.is_empty() {
        return Err(CourseError::FieldRequired(field));
    }
    Ok(())
}

/// Business operations on courses
#[derive(Clone)]
pub struct CourseService {
    repository: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(repository: Arc<dyn CourseRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new course
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCourse) -> CourseResult<Course> {
        required("name", &request.name)?;
        required("start_date", &request.start_date)?;
        required("end_date", &request.end_date)?;

        let start_date = parse_date(&request.start_date).ok_or(CourseError::InvalidStartDate)?;
        let end_date = parse_date(&request.end_date).ok_or(CourseError::InvalidEndDate)?;

        check_order(start_date, end_date).inspect_err(|e| warn!(error = %e, "rejected course"))?;

        let course = self
            .repository
            .create(NewCourse {
                name: request.name,
                start_date,
                end_date,
            })
            .await?;

        info!(id = %course.id, "course created");
        Ok(course)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> CourseResult<Course> {
        Ok(self.repository.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> CourseResult<Vec<Course>> {
        Ok(self.repository.list(filters, offset, limit).await?)
    }

    #[instrument(skip(self))]
    pub async fn count(&self, filters: &Filters) -> CourseResult<usize> {
        Ok(self.repository.count(filters).await?)
    }

    /// Apply a partial update.
    ///
    /// The stored record is read first: an unknown id is reported as
    /// `NotFound` whatever the payload, and the date-ordering check needs the
    /// stored value of whichever date is not being replaced. Ordering is
    /// checked on the resulting pair, so supplying both dates at once cannot
    /// produce a start after its end.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: UpdateCourse) -> CourseResult<Course> {
        let current = self.repository.get(id).await?;

        if let Some(name) = &request.name {
            required("name", name)?;
        }
        if let Some(start_date) = &request.start_date {
            required("start_date", start_date)?;
        }
        if let Some(end_date) = &request.end_date {
            required("end_date", end_date)?;
        }

        let touches_dates = request.changes_dates();
        let changes = CourseChanges {
            start_date: request
                .start_date
                .as_deref()
                .map(|s| parse_date(s).ok_or(CourseError::InvalidStartDate))
                .transpose()?
                .into(),
            end_date: request
                .end_date
                .as_deref()
                .map(|s| parse_date(s).ok_or(CourseError::InvalidEndDate))
                .transpose()?
                .into(),
            name: request.name.into(),
        };

        if touches_dates {
            check_order(
                changes.start_date.or(current.start_date),
                changes.end_date.or(current.end_date),
            )
            .inspect_err(|e| warn!(error = %e, "rejected update"))?;
        }

        self.repository.update(id, &changes).await?;
        info!(id, fields = ?changed_fields(&changes), "course updated");

        Ok(self.repository.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> CourseResult<()> {
        self.repository.delete(id).await?;
        info!(id, "course deleted");
        Ok(())
    }
}

fn changed_fields(changes: &CourseChanges) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if changes.name.is_set() {
        fields.push("name");
    }
    if changes.start_date.is_set() {
        fields.push("start_date");
    }
    if changes.end_date.is_set() {
        fields.push("end_date");
    }
    fields
}
