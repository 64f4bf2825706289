//! The shared analysis service consumed by both façades.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use radar_core::{AnalysisRequest, AnalysisRun};
use radar_llm::PerceptionProvider;

use crate::compare::{decide_winner, ComparisonOutcome};
use crate::consensus::aggregate;
use crate::requester::query_providers;
use crate::store::{AnalysisReport, NewAnalysisReport, ReportStore, StoreError};

/// Reports returned when no explicit limit is requested.
pub const DEFAULT_REPORT_LIMIT: i64 = 10;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input failed validation; nothing was called on its behalf.
    #[error("{0}")]
    Validation(&'static str),

    /// A store read the caller cannot proceed without failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Listing payload for one brand's report history.
#[derive(Debug, Serialize)]
pub struct BrandReports {
    pub brand_name: String,
    pub total_reports: usize,
    pub reports: Vec<AnalysisReport>,
}

/// Orchestrates the three flows: analyze, fetch history, compare.
///
/// Both façades hold one of these; provider clients and the store are
/// injected so tests substitute fakes for either side.
pub struct AnalysisService {
    providers: Vec<Arc<dyn PerceptionProvider>>,
    store: Arc<dyn ReportStore>,
}

impl AnalysisService {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PerceptionProvider>>, store: Arc<dyn ReportStore>) -> Self {
        Self { providers, store }
    }

    /// Run one full analysis: fan out to providers, merge, persist, return.
    ///
    /// Persistence is fire-and-forget — a store failure is logged and the
    /// computed run is still returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] for a blank brand name. Provider
    /// failures never surface here; they land as error outcomes inside the
    /// run.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisRun, AnalysisError> {
        if request.brand_name.trim().is_empty() {
            return Err(AnalysisError::Validation("brand_name is required"));
        }

        let timestamp = Utc::now();
        let models = query_providers(&self.providers, &request).await;
        let consensus = aggregate(&models);

        tracing::info!(
            brand = %request.brand_name,
            overall_score = consensus.overall_score,
            models_used = consensus.models_used.unwrap_or(0),
            confidence = consensus.confidence,
            "analysis complete"
        );

        let run = AnalysisRun {
            brand_name: request.brand_name,
            competitors: request.competitors,
            depth: request.depth,
            timestamp,
            models,
            consensus,
        };

        #[allow(clippy::cast_possible_truncation)]
        let consensus_score = run.consensus.overall_score as i32;
        let record = NewAnalysisReport {
            brand_name: run.brand_name.clone(),
            competitors: run.competitors.clone(),
            results: run.clone(),
            consensus_score,
        };

        if let Err(e) = self.store.append(record).await {
            tracing::error!(brand = %run.brand_name, error = %e, "failed to persist analysis report");
        }

        Ok(run)
    }

    /// Fetch up to `limit` (default 10, clamped to ≥ 1) recent reports.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] for a blank brand name, or a
    /// [`StoreError`] if the read fails.
    pub async fn reports(
        &self,
        brand_name: &str,
        limit: Option<i64>,
    ) -> Result<BrandReports, AnalysisError> {
        if brand_name.trim().is_empty() {
            return Err(AnalysisError::Validation("brand_name is required"));
        }

        let limit = limit.unwrap_or(DEFAULT_REPORT_LIMIT).max(1);
        let reports = self.store.latest(brand_name, limit).await?;

        Ok(BrandReports {
            brand_name: brand_name.to_string(),
            total_reports: reports.len(),
            reports,
        })
    }

    /// Compare the latest scores of two brands.
    ///
    /// The two lookups run concurrently. A brand whose lookup yields nothing
    /// — including a store that is down — is reported as unavailable in a
    /// partial payload rather than failing the comparison.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] when either name is blank.
    pub async fn compare(
        &self,
        brand1: &str,
        brand2: &str,
    ) -> Result<ComparisonOutcome, AnalysisError> {
        if brand1.trim().is_empty() || brand2.trim().is_empty() {
            return Err(AnalysisError::Validation("brand1 and brand2 are required"));
        }

        let (first, second) = tokio::join!(
            self.store.latest_one(brand1),
            self.store.latest_one(brand2)
        );

        for (brand, result) in [(brand1, &first), (brand2, &second)] {
            if let Err(e) = result {
                if !matches!(e, StoreError::NotFound) {
                    tracing::warn!(brand, error = %e, "latest-report lookup failed");
                }
            }
        }

        match (first, second) {
            (Ok(report1), Ok(report2)) => {
                let winner = decide_winner(
                    brand1,
                    report1.consensus_score,
                    brand2,
                    report2.consensus_score,
                );
                let mut comparison = BTreeMap::new();
                comparison.insert(brand1.to_string(), report1);
                comparison.insert(brand2.to_string(), report2);
                Ok(ComparisonOutcome::Full { comparison, winner })
            }
            (first, second) => {
                let mut available = BTreeMap::new();
                available.insert(brand1.to_string(), first.is_ok());
                available.insert(brand2.to_string(), second.is_ok());
                Ok(ComparisonOutcome::Partial {
                    status: "partial",
                    message: "One or both brands need fresh analysis",
                    available,
                })
            }
        }
    }
}
