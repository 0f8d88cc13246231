//! API server initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::routes::{chats, health};
use crate::core::CoreApp;
use crate::core::config::ServerConfig;
use crate::data::ChatStore;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;
        let shutdown = app.shutdown.clone();
        let server = &app.config.server;

        let router = build_router(app.store.clone(), server);

        let listener = TcpListener::bind((server.host.as_str(), server.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))?;
        tracing::debug!(addr = ?listener.local_addr().ok(), "Listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

/// Assemble the full HTTP router
pub fn build_router(store: Arc<dyn ChatStore>, config: &ServerConfig) -> Router {
    let allowed_origins = AllowedOrigins::new(&config.host, config.port, &config.cors_origins);

    Router::new()
        .route("/api/v1/health", get(health::health))
        .nest("/api", chats::routes(store))
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(DefaultBodyLimit::max(config.body_limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::data::InMemoryChatStore;

    fn config(body_limit: usize) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            body_limit,
            cors_origins: Vec::new(),
            max_chats: None,
        }
    }

    fn router(body_limit: usize) -> Router {
        build_router(Arc::new(InMemoryChatStore::new()), &config(body_limit))
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(1024)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router(1024)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_routes_mounted_under_api() {
        let response = router(1024)
            .oneshot(
                Request::builder()
                    .uri("/api/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let body = format!(r#"{{"chats":[],"pad":"{}"}}"#, "x".repeat(256));
        let response = router(64)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/log")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_own_origin() {
        let response = router(1024)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/log")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }
}
