//! Domain types shared by the requester, aggregator, stores, and façades.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requested analysis thoroughness.
///
/// Accepted and echoed through the persisted record, but does not alter the
/// prompt or provider parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl std::fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisDepth::Quick => write!(f, "quick"),
            AnalysisDepth::Standard => write!(f, "standard"),
            AnalysisDepth::Deep => write!(f, "deep"),
        }
    }
}

/// One incoming analysis request. Not persisted itself; echoed inside the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub brand_name: String,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub depth: AnalysisDepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// The settled result of one provider call within one analysis.
///
/// `data` holds the parsed judgement payload verbatim — including the
/// `{"raw_response": …}` fallback shape for prose replies with no JSON block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderOutcome {
    #[must_use]
    pub fn success(data: Value, model: String) -> Self {
        Self {
            status: OutcomeStatus::Success,
            data: Some(data),
            error: None,
            model: Some(model),
        }
    }

    #[must_use]
    pub fn failure(reason: String) -> Self {
        Self {
            status: OutcomeStatus::Error,
            data: None,
            error: Some(reason),
            model: None,
        }
    }
}

/// Per-dimension averages across the successful judgements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusScores {
    pub sentiment: f64,
    pub innovation: f64,
    pub trust: f64,
    pub sustainability: f64,
    pub value: f64,
}

/// The merged judgement for one analysis.
///
/// When no provider succeeded this serializes as
/// `{"overall_score":0,"confidence":0.0,"message":"No valid model responses"}`
/// with `scores` and `models_used` omitted — a valid terminal outcome, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub overall_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ConsensusScores>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_used: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The full result of one analyze call: request echo, per-provider outcomes,
/// and the consensus. This is what gets persisted under `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub brand_name: String,
    pub competitors: Vec<String>,
    pub depth: AnalysisDepth,
    pub timestamp: DateTime<Utc>,
    pub models: BTreeMap<String, ProviderOutcome>,
    pub consensus: ConsensusResult,
}
