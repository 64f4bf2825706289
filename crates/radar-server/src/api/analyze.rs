//! POST /analyze — run a fresh multi-provider analysis.

use axum::{extract::State, Json};
use serde::Deserialize;

use radar_core::{AnalysisDepth, AnalysisRequest, AnalysisRun};

use super::{success, ApiError, ApiSuccess, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzePayload {
    brand_name: Option<String>,
    #[serde(default)]
    competitors: Vec<String>,
    #[serde(default)]
    depth: AnalysisDepth,
}

pub(super) async fn analyze_brand(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzePayload>,
) -> Result<Json<ApiSuccess<AnalysisRun>>, ApiError> {
    let brand_name = payload
        .brand_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ApiError::Validation("brand_name is required"))?;

    let run = state
        .service
        .analyze(AnalysisRequest {
            brand_name,
            competitors: payload.competitors,
            depth: payload.depth,
        })
        .await?;

    Ok(success(run))
}
