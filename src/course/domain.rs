//! Course entity and the request/changes types that flow through the service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wire and storage format for course dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored course record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated course that has not been persisted yet.
///
/// The store assigns the id and timestamps on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Create request as received from the transport.
///
/// Missing JSON fields decode to empty strings and are rejected by the
/// service with `FieldRequired`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateCourse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// Partial update request. `None` leaves the stored value untouched.
///
/// JSON `null` and an omitted key are treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateCourse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl UpdateCourse {
    /// Whether the request touches either date.
    pub fn changes_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Presence marker for a single field of a sparse update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change<T> {
    Keep,
    Set(T),
}

impl<T> Default for Change<T> {
    fn default() -> Self {
        Change::Keep
    }
}

impl<T> Change<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Change::Set(_))
    }

    /// Returns the new value, or `current` when the field is kept.
    pub fn or(self, current: T) -> T {
        match self {
            Change::Keep => current,
            Change::Set(value) => value,
        }
    }
}

impl<T> From<Option<T>> for Change<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Change::Set(value),
            None => Change::Keep,
        }
    }
}

/// The exact set of fields an update writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseChanges {
    pub name: Change<String>,
    pub start_date: Change<NaiveDate>,
    pub end_date: Change<NaiveDate>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        !self.name.is_set() && !self.start_date.is_set() && !self.end_date.is_set()
    }

    /// Applies the changes to a course in place, refreshing `updated_at`.
    pub fn apply_to(&self, course: &mut Course, now: DateTime<Utc>) {
        if let Change::Set(name) = &self.name {
            course.name = name.clone();
        }
        if let Change::Set(start_date) = self.start_date {
            course.start_date = start_date;
        }
        if let Change::Set(end_date) = self.end_date {
            course.end_date = end_date;
        }
        course.updated_at = now;
    }
}
