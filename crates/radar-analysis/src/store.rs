//! The report persistence port.
//!
//! The service talks to storage only through [`ReportStore`], so the
//! Postgres adapter and the in-memory substitute are interchangeable.
//! Records are append-only: nothing in this interface can mutate or delete
//! an existing report.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use radar_core::AnalysisRun;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No report exists for the requested brand.
    #[error("no report found for brand")]
    NotFound,

    /// The backing store failed or rejected the operation.
    #[error("store error: {0}")]
    Backend(String),
}

/// A persisted analysis report, as read back from the store.
///
/// `results` stays an untyped JSON value on reads so that rows written by
/// earlier versions round-trip verbatim through report listings and
/// comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: i64,
    pub brand_name: String,
    pub competitors: Vec<String>,
    pub results: Value,
    pub consensus_score: i32,
    pub created_at: DateTime<Utc>,
}

/// A report about to be appended. `id` and `created_at` are store-assigned.
#[derive(Debug, Clone)]
pub struct NewAnalysisReport {
    pub brand_name: String,
    pub competitors: Vec<String>,
    pub results: AnalysisRun,
    pub consensus_score: i32,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Append one report.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails. Callers in the
    /// analyze flow log and swallow this — persistence failure never fails
    /// the analysis itself.
    async fn append(&self, report: NewAnalysisReport) -> Result<(), StoreError>;

    /// Up to `limit` reports for the brand, most recent first.
    ///
    /// A brand with no history yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the read fails.
    async fn latest(&self, brand_name: &str, limit: i64)
        -> Result<Vec<AnalysisReport>, StoreError>;

    /// The single most recent report for the brand.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the brand has no history — the
    /// compare flow reads that as "needs fresh analysis", not as a failure.
    /// Returns [`StoreError::Backend`] if the read fails.
    async fn latest_one(&self, brand_name: &str) -> Result<AnalysisReport, StoreError>;
}

/// In-memory store for tests and local development without Postgres.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: std::sync::Mutex<Vec<AnalysisReport>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl MemoryReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AnalysisReport>> {
        // Lock poisoning only happens after a panic mid-push; tests want the
        // panic, not a cascade.
        self.reports.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn append(&self, report: NewAnalysisReport) -> Result<(), StoreError> {
        let results = serde_json::to_value(&report.results)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;

        self.lock().push(AnalysisReport {
            id,
            brand_name: report.brand_name,
            competitors: report.competitors,
            results,
            consensus_score: report.consensus_score,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn latest(
        &self,
        brand_name: &str,
        limit: i64,
    ) -> Result<Vec<AnalysisReport>, StoreError> {
        let reports = self.lock();
        let mut matching: Vec<AnalysisReport> = reports
            .iter()
            .filter(|r| r.brand_name == brand_name)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(matching)
    }

    async fn latest_one(&self, brand_name: &str) -> Result<AnalysisReport, StoreError> {
        self.latest(brand_name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_core::{AnalysisDepth, ConsensusResult};
    use std::collections::BTreeMap;

    fn run(brand: &str) -> AnalysisRun {
        AnalysisRun {
            brand_name: brand.to_string(),
            competitors: vec![],
            depth: AnalysisDepth::Standard,
            timestamp: Utc::now(),
            models: BTreeMap::new(),
            consensus: ConsensusResult {
                overall_score: 0,
                scores: None,
                confidence: 0.0,
                models_used: None,
                message: Some("No valid model responses".to_string()),
            },
        }
    }

    fn report(brand: &str, score: i32) -> NewAnalysisReport {
        NewAnalysisReport {
            brand_name: brand.to_string(),
            competitors: vec![],
            results: run(brand),
            consensus_score: score,
        }
    }

    #[tokio::test]
    async fn latest_returns_most_recent_first() {
        let store = MemoryReportStore::new();
        store.append(report("Acme", 10)).await.unwrap();
        store.append(report("Acme", 20)).await.unwrap();
        store.append(report("Globex", 30)).await.unwrap();

        let reports = store.latest("Acme", 10).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].consensus_score, 20);
        assert_eq!(reports[1].consensus_score, 10);
    }

    #[tokio::test]
    async fn latest_respects_limit() {
        let store = MemoryReportStore::new();
        for score in 0..5 {
            store.append(report("Acme", score)).await.unwrap();
        }
        let reports = store.latest("Acme", 2).await.unwrap();
        assert_eq!(reports.len(), 2);
    }

    #[tokio::test]
    async fn unknown_brand_yields_empty_not_error() {
        let store = MemoryReportStore::new();
        let reports = store.latest("Nobody", 10).await.unwrap();
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn latest_one_is_not_found_for_unknown_brand() {
        let store = MemoryReportStore::new();
        let result = store.latest_one("Nobody").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
