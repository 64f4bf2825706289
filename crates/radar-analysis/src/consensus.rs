//! Consensus scoring across provider judgements.
//!
//! The formula and rounding rule are frozen: persisted `consensus_score`
//! values from earlier deployments must stay comparable with new ones, so
//! any change here is a data migration, not a refactor.

use std::collections::BTreeMap;

use serde_json::Value;

use radar_core::{ConsensusResult, ConsensusScores, OutcomeStatus, ProviderOutcome};

const NO_VALID_RESPONSES: &str = "No valid model responses";

/// Merge the settled provider outcomes for one analysis into a consensus.
///
/// Only successful outcomes contribute. Within a successful judgement,
/// missing or non-numeric fields score 0 rather than disqualifying the
/// judgement — a provider that answered at all is counted. Zero successes is
/// a terminal, non-erroring result with confidence 0.
///
/// `overall_score` rescales sentiment from [-1, 1] to [0, 100] and averages
/// it with the four 0–10 dimensions (each ×10), then rounds half away from
/// zero.
#[must_use]
pub fn aggregate(outcomes: &BTreeMap<String, ProviderOutcome>) -> ConsensusResult {
    let valid: Vec<ConsensusScores> = outcomes
        .values()
        .filter(|o| o.status == OutcomeStatus::Success)
        .map(extract_scores)
        .collect();

    if valid.is_empty() {
        return ConsensusResult {
            overall_score: 0,
            scores: None,
            confidence: 0.0,
            models_used: None,
            message: Some(NO_VALID_RESPONSES.to_string()),
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let denom = valid.len() as f64;
    let avg = ConsensusScores {
        sentiment: valid.iter().map(|s| s.sentiment).sum::<f64>() / denom,
        innovation: valid.iter().map(|s| s.innovation).sum::<f64>() / denom,
        trust: valid.iter().map(|s| s.trust).sum::<f64>() / denom,
        sustainability: valid.iter().map(|s| s.sustainability).sum::<f64>() / denom,
        value: valid.iter().map(|s| s.value).sum::<f64>() / denom,
    };

    let overall = ((avg.sentiment + 1.0) * 50.0
        + avg.innovation * 10.0
        + avg.trust * 10.0
        + avg.sustainability * 10.0
        + avg.value * 10.0)
        / 5.0;

    #[allow(clippy::cast_precision_loss)]
    let total = outcomes.len() as f64;
    #[allow(clippy::cast_possible_truncation)]
    let overall_score = overall.round() as i64;

    #[allow(clippy::cast_precision_loss)]
    let confidence = valid.len() as f64 / total;

    ConsensusResult {
        overall_score,
        scores: Some(avg),
        confidence,
        models_used: Some(valid.len()),
        message: None,
    }
}

/// Pull the five numeric dimensions out of a judgement payload.
///
/// A payload that is not an object (or an outcome with no payload at all)
/// scores zero on every dimension — indistinguishable from a judgement whose
/// fields are genuinely zero, which is the accepted ambiguity of the score
/// contract.
fn extract_scores(outcome: &ProviderOutcome) -> ConsensusScores {
    let data = outcome.data.as_ref();
    let field = |key: &str| -> f64 {
        data.and_then(|d| d.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };

    ConsensusScores {
        sentiment: field("sentiment"),
        innovation: field("innovation_score"),
        trust: field("trust_score"),
        sustainability: field("sustainability_score"),
        value: field("value_score"),
    }
}
