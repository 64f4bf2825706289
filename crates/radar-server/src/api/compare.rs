//! POST /compare — head-to-head on the two latest consensus scores.

use axum::{extract::State, Json};
use serde::Deserialize;

use radar_analysis::ComparisonOutcome;

use super::{success, ApiError, ApiSuccess, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ComparePayload {
    brand1: Option<String>,
    brand2: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|name| !name.trim().is_empty())
}

pub(super) async fn compare_brands(
    State(state): State<AppState>,
    Json(payload): Json<ComparePayload>,
) -> Result<Json<ApiSuccess<ComparisonOutcome>>, ApiError> {
    let (Some(brand1), Some(brand2)) = (non_blank(payload.brand1), non_blank(payload.brand2))
    else {
        return Err(ApiError::Validation("brand1 and brand2 are required"));
    };

    let outcome = state.service.compare(&brand1, &brand2).await?;
    Ok(success(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected_like_missing_ones() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("Acme".to_string())), Some("Acme".to_string()));
    }
}
