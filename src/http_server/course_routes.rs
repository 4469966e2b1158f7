//! Course HTTP Routes
//!
//! Thin adapters between JSON requests and [`CourseService`].

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};

use crate::course::{Course, CourseService, CreateCourse, Filters, UpdateCourse};
use crate::pagination::Meta;

use super::errors::ApiResult;
use super::response::ApiResponse;

// ==================
// Shared State
// ==================

/// Course state shared across handlers
pub struct CourseState {
    pub service: CourseService,
    pub paginator_limit_default: usize,
}

impl CourseState {
    pub fn new(service: CourseService, paginator_limit_default: usize) -> Self {
        Self {
            service,
            paginator_limit_default,
        }
    }
}

// ==================
// Request Types
// ==================

/// `GET /courses` query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub name: String,
    pub page: i64,
    pub limit: i64,
}

impl ListQuery {
    /// Non-numeric `page`/`limit` values count as absent
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let number = |key: &str| {
            params
                .get(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        Self {
            name: params.get("name").cloned().unwrap_or_default(),
            page: number("page"),
            limit: number("limit"),
        }
    }
}

// ==================
// Routes
// ==================

pub fn course_routes(state: Arc<CourseState>) -> Router {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .with_state(state)
}

type SharedState = Arc<CourseState>;

async fn create_course(
    State(state): State<SharedState>,
    body: Result<Json<CreateCourse>, JsonRejection>,
) -> ApiResult<ApiResponse<Course>> {
    let Json(request) = body?;
    let course = state.service.create(request).await?;
    Ok(ApiResponse::created("Success create course", course))
}

async fn list_courses(
    State(state): State<SharedState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<Course>>> {
    let Query(params) = query?;
    let query = ListQuery::from_params(&params);
    let filters = Filters::by_name(query.name);

    let total = state.service.count(&filters).await?;
    let meta = Meta::new(query.page, query.limit, total, state.paginator_limit_default)?;
    let courses = state
        .service
        .list(&filters, meta.offset(), meta.limit())
        .await?;

    Ok(ApiResponse::ok("Success get courses", courses).with_meta(meta))
}

async fn get_course(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Course>> {
    let course = state.service.get(&id).await?;
    Ok(ApiResponse::ok("Success get course", course))
}

async fn update_course(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateCourse>, JsonRejection>,
) -> ApiResult<ApiResponse<Course>> {
    let Json(request) = body?;
    let course = state.service.update(&id, request).await?;
    Ok(ApiResponse::ok(
        format!("Success update course with ID -> '{id}'"),
        course,
    ))
}

async fn delete_course(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    state.service.delete(&id).await?;
    Ok(ApiResponse::message(format!(
        "Success delete course with ID -> '{id}'"
    )))
}
