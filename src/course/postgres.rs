//! PostgreSQL course repository backed by sqlx.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error};
use uuid::Uuid;

use super::domain::{Change, Course, CourseChanges, NewCourse};
use super::filter::Filters;
use super::repository::{CourseRepository, RepositoryError, RepositoryResult};

const COLUMNS: &str = "id, name, start_date, end_date, created_at, updated_at";

#[derive(FromRow)]
struct CourseRow {
    id: String,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    /// Connect to `database_url` and make sure the `courses` table exists
    pub async fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        Self::try_new(pool).await
    }

    pub async fn try_new(pool: PgPool) -> RepositoryResult<Self> {
        sqlx::query(
            r#"
        CREATE TABLE IF NOT EXISTS courses (
           id TEXT PRIMARY KEY,
           name TEXT NOT NULL,
           start_date DATE NOT NULL,
           end_date DATE NOT NULL,
           created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
           updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filters: &Filters) {
    if let Some(pattern) = filters.name_like_pattern() {
        builder.push(" WHERE lower(name) LIKE ").push_bind(pattern);
    }
}

fn select_query<'a>(filters: &Filters, offset: usize, limit: usize) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM courses"));
    push_filters(&mut builder, filters);
    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
    builder
}

fn count_query<'a>(filters: &Filters) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM courses");
    push_filters(&mut builder, filters);
    builder
}

/// `updated_at` is always written so an empty change set still reports
/// whether the row exists.
fn update_query<'a>(id: &'a str, changes: &'a CourseChanges) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE courses SET updated_at = now()");
    if let Change::Set(name) = &changes.name {
        builder.push(", name = ").push_bind(name.as_str());
    }
    if let Change::Set(start_date) = changes.start_date {
        builder.push(", start_date = ").push_bind(start_date);
    }
    if let Change::Set(end_date) = changes.end_date {
        builder.push(", end_date = ").push_bind(end_date);
    }
    builder.push(" WHERE id = ").push_bind(id);
    builder
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, course: NewCourse) -> RepositoryResult<Course> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "INSERT INTO courses (id, name, start_date, end_date) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&course.name)
        .bind(course.start_date)
        .bind(course.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "insert course failed");
            e
        })?;

        debug!(id = %row.id, "course stored");
        Ok(row.into())
    }

    async fn get(&self, id: &str) -> RepositoryResult<Course> {
        sqlx::query_as::<_, CourseRow>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Course::from)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        let rows = select_query(filters, offset, limit)
            .build_query_as::<CourseRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn count(&self, filters: &Filters) -> RepositoryResult<usize> {
        let count: i64 = count_query(filters)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        usize::try_from(count).map_err(|e| RepositoryError::Storage(e.to_string()))
    }

    async fn update(&self, id: &str, changes: &CourseChanges) -> RepositoryResult<()> {
        let result = update_query(id, changes).build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        debug!(id, "course removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_filter() {
        let builder = select_query(&Filters::default(), 0, 10);
        assert_eq!(
            builder.sql(),
            "SELECT id, name, start_date, end_date, created_at, updated_at FROM courses \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_select_and_count_share_filter() {
        let filters = Filters::by_name("Go");
        let select = select_query(&filters, 0, usize::MAX);
        let count = count_query(&filters);

        assert!(select.sql().contains(" WHERE lower(name) LIKE $1 "));
        assert_eq!(
            count.sql(),
            "SELECT COUNT(*) FROM courses WHERE lower(name) LIKE $1"
        );
    }

    #[test]
    fn test_update_sets_only_changed_columns() {
        let changes = CourseChanges {
            end_date: Change::Set(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()),
            ..Default::default()
        };
        let builder = update_query("c1", &changes);

        assert_eq!(
            builder.sql(),
            "UPDATE courses SET updated_at = now(), end_date = $1 WHERE id = $2"
        );
    }

    #[test]
    fn test_empty_update_still_targets_row() {
        let changes = CourseChanges::default();
        let builder = update_query("c1", &changes);

        assert_eq!(
            builder.sql(),
            "UPDATE courses SET updated_at = now() WHERE id = $1"
        );
    }
}
