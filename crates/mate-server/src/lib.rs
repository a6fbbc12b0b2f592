//! Mate Web Server
//!
//! Axum-based REST API over the Mate insights pipeline.
//!
//! The server is stateless: every request carries the transactions (and
//! optionally budgets) to analyze, and nothing is stored between requests.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (request size limits, well-formed dates and sensitivity)
//! - Security headers on every response
//! - JSON error bodies for rejected requests

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;

use mate_core::InsightEngine;

mod handlers;

pub use handlers::AnalysisRequest;

/// Maximum number of transactions accepted in one request
pub const MAX_TRANSACTIONS: usize = 100_000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub engine: InsightEngine,
}

/// Create the application router
pub fn create_router(engine: InsightEngine, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { engine });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Full pipeline
        .route("/insights", post(handlers::full_report))
        // Individual components
        .route("/insights/summary", post(handlers::summary))
        .route("/insights/forecast", post(handlers::forecast))
        .route("/insights/anomalies", post(handlers::anomalies))
        .route("/insights/behavior", post(handlers::behavior))
        .route("/insights/budgets", post(handlers::budgets))
        .route("/insights/recommendations", post(handlers::recommendations));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    engine: InsightEngine,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(engine, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Request error rendered as `{"error": message}`
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "Rejected request");
        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}
