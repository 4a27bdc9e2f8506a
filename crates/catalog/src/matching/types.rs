use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decision class derived from `best_score` (spec §4.3 thresholds table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatusOutcome {
    Matched,
    Potential,
    NoMatch,
    NeedsCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub product_id: Uuid,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub status: MatchStatusOutcome,
    pub best_score: f64,
    pub candidates: Vec<MatchCandidate>,
}

impl MatchResult {
    pub fn needs_category() -> Self {
        Self { status: MatchStatusOutcome::NeedsCategory, best_score: 0.0, candidates: Vec::new() }
    }
}
