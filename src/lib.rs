//! course-api - CRUD service for course records
//!
//! Layers, outermost first: `http_server` (axum transport), `course`
//! (validation, sparse updates, persistence contract) and `pagination`.

pub mod cli;
pub mod course;
pub mod http_server;
pub mod pagination;
