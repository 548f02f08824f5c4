//! Keyword-overlap retrieval over the conservation tip corpus.

use crate::profile::{FarmerProfile, IrrigationType, WaterLevel};
use crate::reference::{Tip, TIP_CORPUS, TIP_SOURCE};
use serde::Serialize;
use tracing::debug;

/// Tips selected for a query, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipSelection {
    pub tips: Vec<ScoredTip>,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTip {
    pub tip: Tip,
    /// Number of the tip's keywords found in the query
    pub score: usize,
}

/// Query text for a turn: irrigation type, a low-water marker, then the raw message.
pub fn build_query(profile: &FarmerProfile, message: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if profile.irrigation_type != IrrigationType::Unknown {
        parts.push(profile.irrigation_type.as_str());
    }
    if profile.water_level == WaterLevel::Low {
        parts.push("کم آب");
    }
    parts.push(message);
    parts.join(" ")
}

/// Rank the built-in corpus against `query`.
pub fn retrieve_tips(query: &str, max_tips: usize) -> TipSelection {
    retrieve_from(TIP_CORPUS, query, max_tips)
}

/// Rank `corpus` by keyword overlap with `query` and keep the top `max_tips`.
///
/// Ties keep corpus order; zero-score tips are still returned.
pub fn retrieve_from(corpus: &[Tip], query: &str, max_tips: usize) -> TipSelection {
    let query = query.to_lowercase();

    let mut scored: Vec<ScoredTip> = corpus
        .iter()
        .map(|tip| ScoredTip {
            tip: *tip,
            score: tip
                .keywords
                .iter()
                .filter(|kw| query.contains(*kw))
                .count(),
        })
        .collect();

    // stable: equal scores keep corpus order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(max_tips);

    debug!(
        corpus = corpus.len(),
        selected = scored.len(),
        top_score = scored.first().map(|s| s.score).unwrap_or(0),
        "Retrieved tips"
    );

    TipSelection {
        tips: scored,
        sources: vec![TIP_SOURCE.to_string()],
    }
}
