//! Head-to-head comparison of the latest consensus scores.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::AnalysisReport;

/// Score difference below which two brands are reported as evenly matched.
/// Policy constant, deliberately not configurable.
pub const TIE_MARGIN: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ComparisonWinner {
    Tie { result: String, message: String },
    Decided { result: String, margin: i32 },
}

/// The outcome of a compare call: either both brands had history, or the
/// caller is told which of them needs a fresh analysis first.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Partial {
        status: &'static str,
        message: &'static str,
        available: BTreeMap<String, bool>,
    },
    Full {
        comparison: BTreeMap<String, AnalysisReport>,
        winner: ComparisonWinner,
    },
}

/// Decide the winner between two latest consensus scores.
///
/// A margin strictly below [`TIE_MARGIN`] is a tie regardless of which brand
/// is nominally ahead; otherwise the higher score wins and the margin is
/// reported.
#[must_use]
pub fn decide_winner(brand1: &str, score1: i32, brand2: &str, score2: i32) -> ComparisonWinner {
    let margin = (score1 - score2).abs();
    if margin < TIE_MARGIN {
        ComparisonWinner::Tie {
            result: "tie".to_string(),
            message: "Brands are evenly matched".to_string(),
        }
    } else {
        let result = if score1 > score2 { brand1 } else { brand2 };
        ComparisonWinner::Decided {
            result: result.to_string(),
            margin,
        }
    }
}
