//! Course Service Tests
//!
//! Validation, sparse update and listing behaviour of `CourseService` over
//! the in-memory repository:
//! - Create rejects bad or misordered dates before anything is stored
//! - Update writes only the supplied fields
//! - Unknown ids are NotFound whatever the payload
//! - Count and List agree on the same filter
//! - Store failures reach the caller as Storage errors

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use course_api::course::{
    Course, CourseChanges, CourseError, CourseRepository, CourseService, CreateCourse, Filters,
    InMemoryCourseRepository, NewCourse, RepositoryError, RepositoryResult, UpdateCourse,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn service() -> CourseService {
    CourseService::new(Arc::new(InMemoryCourseRepository::new()))
}

fn create(name: &str, start: &str, end: &str) -> CreateCourse {
    CreateCourse {
        name: name.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn total(svc: &CourseService) -> usize {
    svc.count(&Filters::default()).await.unwrap()
}

/// In-memory store that fails every call while `down` is set
#[derive(Default)]
struct FlakyRepository {
    inner: InMemoryCourseRepository,
    down: AtomicBool,
}

impl FlakyRepository {
    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> RepositoryResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("disk gone".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for FlakyRepository {
    async fn create(&self, course: NewCourse) -> RepositoryResult<Course> {
        self.check()?;
        self.inner.create(course).await
    }

    async fn get(&self, id: &str) -> RepositoryResult<Course> {
        self.check()?;
        self.inner.get(id).await
    }

    async fn list(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Course>> {
        self.check()?;
        self.inner.list(filters, offset, limit).await
    }

    async fn count(&self, filters: &Filters) -> RepositoryResult<usize> {
        self.check()?;
        self.inner.count(filters).await
    }

    async fn update(&self, id: &str, changes: &CourseChanges) -> RepositoryResult<()> {
        self.check()?;
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_success_returns_stored_fields() {
    let svc = service();

    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    assert!(!course.id.is_empty());
    assert_eq!(course.name, "Go 101");
    assert_eq!(course.start_date, date(2024, 1, 1));
    assert_eq!(course.end_date, date(2024, 6, 1));
    assert_eq!(svc.get(&course.id).await.unwrap(), course);
}

#[tokio::test]
async fn test_create_equal_dates() {
    let svc = service();

    let err = svc
        .create(create("Go 101", "2024-01-01", "2024-01-01"))
        .await
        .unwrap_err();

    assert_eq!(err, CourseError::EqualDates);
    assert_eq!(total(&svc).await, 0);
}

#[tokio::test]
async fn test_create_start_after_end() {
    let svc = service();

    let err = svc
        .create(create("Go 101", "2024-03-01", "2024-01-01"))
        .await
        .unwrap_err();

    assert_eq!(err, CourseError::EndDateNotAfterStart);
    assert_eq!(total(&svc).await, 0);
}

#[tokio::test]
async fn test_create_date_parse_precedence() {
    let svc = service();

    // Start is checked first even when both are bad.
    let err = svc
        .create(create("Go 101", "2024-13-01", "garbage"))
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::InvalidStartDate);

    let err = svc
        .create(create("Go 101", "2024-01-01", "2024-02-30"))
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::InvalidEndDate);

    assert_eq!(total(&svc).await, 0);
}

#[tokio::test]
async fn test_create_missing_name() {
    let svc = service();

    let err = svc
        .create(create("", "2024-01-01", "2024-06-01"))
        .await
        .unwrap_err();

    assert_eq!(err, CourseError::FieldRequired("name"));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_name_only_keeps_dates() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    let updated = svc
        .update(
            &course.id,
            UpdateCourse {
                name: Some("Advanced Go".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Advanced Go");
    assert_eq!(updated.start_date, course.start_date);
    assert_eq!(updated.end_date, course.end_date);
    assert_eq!(updated.created_at, course.created_at);
}

#[tokio::test]
async fn test_update_with_no_fields_is_accepted_noop() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    let updated = svc
        .update(&course.id, UpdateCourse::default())
        .await
        .unwrap();

    assert_eq!(updated.name, course.name);
    assert_eq!(updated.start_date, course.start_date);
    assert_eq!(updated.end_date, course.end_date);
}

#[tokio::test]
async fn test_update_start_after_stored_end() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    let err = svc
        .update(
            &course.id,
            UpdateCourse {
                start_date: Some("2024-07-01".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::EndDateNotAfterStart);

    // Rejected update leaves the record untouched.
    assert_eq!(svc.get(&course.id).await.unwrap().start_date, date(2024, 1, 1));
}

#[tokio::test]
async fn test_update_end_before_stored_start() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-03-01", "2024-06-01"))
        .await
        .unwrap();

    let err = svc
        .update(
            &course.id,
            UpdateCourse {
                end_date: Some("2024-02-01".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::EndDateNotAfterStart);
}

#[tokio::test]
async fn test_update_invalid_date_text() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    let err = svc
        .update(
            &course.id,
            UpdateCourse {
                start_date: Some("tomorrow".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::InvalidStartDate);

    let err = svc
        .update(
            &course.id,
            UpdateCourse {
                end_date: Some("2024/09/01".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::InvalidEndDate);
}

#[tokio::test]
async fn test_update_parses_both_dates_before_ordering() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    // The new start is past the stored end, but the unparseable end wins.
    let err = svc
        .update(
            &course.id,
            UpdateCourse {
                start_date: Some("2024-07-01".to_string()),
                end_date: Some("garbage".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::InvalidEndDate);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found_for_any_payload() {
    let svc = service();

    let payloads = [
        UpdateCourse::default(),
        UpdateCourse {
            name: Some(String::new()),
            ..Default::default()
        },
        UpdateCourse {
            start_date: Some("not a date".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        },
        UpdateCourse {
            name: Some("Valid".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-06-01".to_string()),
        },
    ];

    for payload in payloads {
        let err = svc.update("missing-id", payload).await.unwrap_err();
        assert_eq!(err, CourseError::NotFound("missing-id".to_string()));
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_unknown_id() {
    let svc = service();

    let err = svc.delete("unknown-id").await.unwrap_err();
    assert_eq!(err, CourseError::NotFound("unknown-id".to_string()));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let svc = service();
    let course = svc
        .create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    svc.delete(&course.id).await.unwrap();

    assert!(matches!(
        svc.get(&course.id).await,
        Err(CourseError::NotFound(_))
    ));
}

// =============================================================================
// List / Count
// =============================================================================

#[tokio::test]
async fn test_count_matches_unbounded_list() {
    let svc = service();
    for name in ["Go 101", "Advanced Go", "Rust Basics", "GOLANG tooling", "Python"] {
        svc.create(create(name, "2024-01-01", "2024-06-01"))
            .await
            .unwrap();
    }

    for filters in [
        Filters::default(),
        Filters::by_name("go"),
        Filters::by_name("RUST"),
        Filters::by_name("nothing"),
    ] {
        let count = svc.count(&filters).await.unwrap();
        let listed = svc.list(&filters, 0, usize::MAX).await.unwrap();
        assert_eq!(count, listed.len(), "filter {:?}", filters);
    }

    assert_eq!(svc.count(&Filters::by_name("go")).await.unwrap(), 3);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let svc = service();
    for name in ["first", "second", "third"] {
        svc.create(create(name, "2024-01-01", "2024-06-01"))
            .await
            .unwrap();
    }

    let names: Vec<String> = svc
        .list(&Filters::default(), 0, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, vec!["third", "second"]);
}

// =============================================================================
// Storage Failures
// =============================================================================

#[tokio::test]
async fn test_storage_failures_propagate() {
    let repository = Arc::new(FlakyRepository::default());
    let svc = CourseService::new(repository.clone());
    svc.create(create("Go 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap();

    repository.set_down(true);

    let err = svc
        .create(create("Rust 101", "2024-01-01", "2024-06-01"))
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::Storage("disk gone".to_string()));
    assert!(matches!(
        svc.count(&Filters::default()).await,
        Err(CourseError::Storage(_))
    ));
    assert!(matches!(
        svc.list(&Filters::default(), 0, 10).await,
        Err(CourseError::Storage(_))
    ));

    repository.set_down(false);
    assert_eq!(total(&svc).await, 1);
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let repository = Arc::new(FlakyRepository::default());
    repository.set_down(true);
    let svc = CourseService::new(repository);

    let err = svc
        .create(create("Go 101", "2024-01-01", "2024-01-01"))
        .await
        .unwrap_err();
    assert_eq!(err, CourseError::EqualDates);
}
