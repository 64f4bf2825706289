//! Database operations for the `analysis_reports` table.
//!
//! The table is append-only by contract: this module exposes one insert and
//! two reads, and nothing else ever touches the rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use radar_analysis::{AnalysisReport, NewAnalysisReport, ReportStore, StoreError};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `analysis_reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisReportRow {
    pub id: i64,
    pub brand_name: String,
    pub competitors: Value,
    pub results: Value,
    pub consensus_score: i32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a new analysis report and return its generated id.
///
/// `competitors` and `results` are stored as JSONB; `created_at` is assigned
/// by the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_analysis_report(
    pool: &PgPool,
    brand_name: &str,
    competitors: &Value,
    results: &Value,
    consensus_score: i32,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO analysis_reports \
             (brand_name, competitors, results, consensus_score) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(brand_name)
    .bind(competitors)
    .bind(results)
    .bind(consensus_score)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List recent reports for a brand, most recent first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reports_by_brand(
    pool: &PgPool,
    brand_name: &str,
    limit: i64,
) -> Result<Vec<AnalysisReportRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisReportRow>(
        "SELECT id, brand_name, competitors, results, consensus_score, created_at \
         FROM analysis_reports \
         WHERE brand_name = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(brand_name)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Return the most recent report for a brand, or `None` if none exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_report(
    pool: &PgPool,
    brand_name: &str,
) -> Result<Option<AnalysisReportRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisReportRow>(
        "SELECT id, brand_name, competitors, results, consensus_score, created_at \
         FROM analysis_reports \
         WHERE brand_name = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(brand_name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

// ---------------------------------------------------------------------------
// Port adapter
// ---------------------------------------------------------------------------

/// Postgres-backed implementation of the [`ReportStore`] port.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_report(row: AnalysisReportRow) -> AnalysisReport {
    // Rows are written with a string-array competitors column; tolerate
    // anything else by treating it as empty rather than failing the read.
    let competitors = match serde_json::from_value(row.competitors) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(report_id = row.id, error = %e, "malformed competitors column");
            Vec::new()
        }
    };

    AnalysisReport {
        id: row.id,
        brand_name: row.brand_name,
        competitors,
        results: row.results,
        consensus_score: row.consensus_score,
        created_at: row.created_at,
    }
}

fn map_db_error(error: DbError) -> StoreError {
    match error {
        DbError::NotFound => StoreError::NotFound,
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn append(&self, report: NewAnalysisReport) -> Result<(), StoreError> {
        let competitors =
            serde_json::to_value(&report.competitors).map_err(|e| map_db_error(e.into()))?;
        let results = serde_json::to_value(&report.results).map_err(|e| map_db_error(e.into()))?;

        insert_analysis_report(
            &self.pool,
            &report.brand_name,
            &competitors,
            &results,
            report.consensus_score,
        )
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn latest(
        &self,
        brand_name: &str,
        limit: i64,
    ) -> Result<Vec<AnalysisReport>, StoreError> {
        let rows = list_reports_by_brand(&self.pool, brand_name, limit)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_report).collect())
    }

    async fn latest_one(&self, brand_name: &str) -> Result<AnalysisReport, StoreError> {
        let row = get_latest_report(&self.pool, brand_name)
            .await
            .map_err(map_db_error)?;
        row.map(row_to_report).ok_or(StoreError::NotFound)
    }
}
