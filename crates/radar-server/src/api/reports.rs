//! GET /reports/{brand_name} — report history for one brand.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use radar_analysis::BrandReports;

use super::{success, ApiError, ApiSuccess, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ReportsQuery {
    limit: Option<String>,
}

/// Absent or unparseable limits fall back to the service default rather than
/// rejecting the request.
fn parse_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
}

pub(super) async fn list_brand_reports(
    State(state): State<AppState>,
    Path(brand_name): Path<String>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ApiSuccess<BrandReports>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref());
    let listing = state.service.reports(&brand_name, limit).await?;
    Ok(success(listing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_limit_is_none() {
        assert_eq!(parse_limit(None), None);
    }

    #[test]
    fn numeric_limit_parses() {
        assert_eq!(parse_limit(Some("25")), Some(25));
    }

    #[test]
    fn garbage_limit_falls_back_to_none() {
        assert_eq!(parse_limit(Some("a-lot")), None);
    }
}
