//! # HTTP Server Module
//!
//! Axum transport for the course service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `POST /courses`, `GET /courses` - Create and list courses
//! - `GET|PATCH|DELETE /courses/:id` - Read, partially update and delete a course

pub mod config;
pub mod course_routes;
pub mod errors;
pub mod health_routes;
pub mod response;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use errors::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use server::HttpServer;
