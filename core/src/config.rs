//! Pipeline configuration with environment overrides.

use crate::memory::DEFAULT_MAX_TURNS;
use serde::{Deserialize, Serialize};

/// Tunables for the advisory pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Turns retained per farmer in the session store
    pub session_max_turns: usize,
    /// Tips passed to the coach per turn
    pub max_tips: usize,
    /// Land size assumed when the farmer never stated one
    pub default_land_size_ha: f64,
    /// Sampling temperature for the coach answer
    pub temperature: f32,
    /// Characters of the user message kept in the interaction log
    pub log_input_chars: usize,
    /// Characters of the answer kept in the interaction log
    pub log_answer_chars: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            session_max_turns: env_parse("AABSMART_SESSION_MAX_TURNS").unwrap_or(DEFAULT_MAX_TURNS),
            max_tips: env_parse("AABSMART_MAX_TIPS").unwrap_or(3),
            default_land_size_ha: env_parse("AABSMART_DEFAULT_LAND_HA").unwrap_or(5.0),
            temperature: env_parse("AABSMART_TEMPERATURE").unwrap_or(0.3),
            log_input_chars: 100,
            log_answer_chars: 200,
        }
    }
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .and_then(|v| v.trim().parse::<T>().ok())
}
