//! # HTTP Server
//!
//! Combines the course and health routers with CORS, tracing and timeout
//! layers.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderName, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::course::CourseService;

use super::config::ServerConfig;
use super::course_routes::{course_routes, CourseState};
use super::health_routes::health_routes;

const ALLOWED_HEADERS: [&str; 10] = [
    "accept",
    "authorization",
    "cache-control",
    "content-type",
    "dnt",
    "if-modified-since",
    "keep-alive",
    "origin",
    "user-agent",
    "x-requested-with",
];

/// HTTP server for the course API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, service: CourseService) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        let origin = if config.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::OPTIONS,
                Method::HEAD,
                Method::DELETE,
            ])
            .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, service: CourseService) -> Router {
        let course_state = Arc::new(CourseState::new(service, config.paginator_limit_default));

        Router::new()
            .merge(health_routes())
            .merge(course_routes(course_state))
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors_layer(config))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "course API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::InMemoryCourseRepository;

    fn service() -> CourseService {
        CourseService::new(Arc::new(InMemoryCourseRepository::new()))
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(ServerConfig::default(), service());
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(ServerConfig::with_port(9090), service());
        assert_eq!(server.socket_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_router_with_cors_origins_builds() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, service()).router();
    }
}
