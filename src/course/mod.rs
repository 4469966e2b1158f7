//! # Course Module
//!
//! Course records and the rules that govern them:
//!
//! - `service` validates requests and computes sparse updates
//! - `repository` is the persistence contract the service depends on
//! - `memory` and `postgres` implement that contract

pub mod domain;
pub mod errors;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod service;

pub use domain::{Change, Course, CourseChanges, CreateCourse, NewCourse, UpdateCourse};
pub use errors::{CourseError, CourseResult};
pub use filter::Filters;
pub use memory::InMemoryCourseRepository;
pub use postgres::PgCourseRepository;
pub use repository::{CourseRepository, RepositoryError, RepositoryResult};
pub use service::CourseService;
