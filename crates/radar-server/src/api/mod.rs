mod analyze;
mod compare;
mod reports;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use radar_analysis::{AnalysisError, AnalysisService};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

/// Success envelope: `{"success": true, "data": …}`.
///
/// This wire shape (and the bare `{"error": …}` validation body below) is the
/// service's historical contract; clients depend on it verbatim.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
}

pub(super) fn success<T: Serialize>(data: T) -> Json<ApiSuccess<T>> {
    Json(ApiSuccess {
        success: true,
        data,
    })
}

#[derive(Debug)]
pub enum ApiError {
    /// Missing or blank required input; rejected before any work happens.
    Validation(&'static str),
    /// Anything unexpected; the message is safe to show callers.
    Internal(String),
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::Validation(msg) => ApiError::Validation(msg),
            AnalysisError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": msg })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

async fn health() -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        service: "vibesradar",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze::analyze_brand))
        .route("/reports/{brand_name}", get(reports::list_brand_reports))
        .route("/compare", post(compare::compare_brands))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}
