use crate::generation::{GenerationRequest, TextGenerator};
use crate::observability::truncate_chars;
use serde::{Deserialize, Serialize};
use tracing::warn;

const CRITIC_SYSTEM_PROMPT: &str = r#"You are an expert agricultural advisor evaluator. Compare two answers and determine which is better based on the given criteria.

Output ONLY valid JSON in this format:
{"winner": "A"|"B"|"tie", "reason": "brief explanation"}

Be objective and focus on practical agricultural advice quality."#;

/// Characters of an unparsable reply kept in the verdict reason
const RAW_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "A", alias = "a")]
    A,
    #[serde(rename = "B", alias = "b")]
    B,
    #[serde(rename = "tie", alias = "Tie", alias = "TIE")]
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticVerdict {
    pub winner: Winner,
    #[serde(default)]
    pub reason: String,
}

impl CriticVerdict {
    fn tie(reason: String) -> Self {
        Self {
            winner: Winner::Tie,
            reason,
        }
    }
}

/// Parse the judge's JSON reply. Anything malformed is a tie that keeps a
/// preview of the raw text.
pub fn parse_verdict(raw: &str) -> CriticVerdict {
    serde_json::from_str::<CriticVerdict>(raw.trim()).unwrap_or_else(|_| {
        CriticVerdict::tie(format!(
            "Could not parse response: {}",
            truncate_chars(raw, RAW_PREVIEW_CHARS)
        ))
    })
}

/// Ask the judge model which of two answers is better under `criteria`.
pub async fn critique(
    generator: &dyn TextGenerator,
    answer_a: &str,
    answer_b: &str,
    criteria: &str,
) -> CriticVerdict {
    let request = GenerationRequest {
        system: CRITIC_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Compare these two agricultural advisory answers:\n\nAnswer A:\n{answer_a}\n\nAnswer B:\n{answer_b}\n\nCriteria: {criteria}\n\nWhich answer is better? Output JSON only."
        ),
        temperature: 0.1,
    };

    match generator.generate(&request).await {
        Ok(generation) => parse_verdict(&generation.text),
        Err(err) => {
            warn!(error = %err, "Critic generation failed");
            CriticVerdict::tie(format!("Critic unavailable: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Generation, GenerationError, MockTextGenerator};

    #[test]
    fn test_parse_valid_verdict() {
        let v = parse_verdict(r#" {"winner": "B", "reason": "more concrete"} "#);
        assert_eq!(v.winner, Winner::B);
        assert_eq!(v.reason, "more concrete");
    }

    #[test]
    fn test_parse_malformed_is_tie_with_raw_preview() {
        let raw = "I think A is better because...";
        let v = parse_verdict(raw);
        assert_eq!(v.winner, Winner::Tie);
        assert!(v.reason.contains(raw));

        let long = "x".repeat(500);
        let v = parse_verdict(&long);
        assert_eq!(v.reason.len(), "Could not parse response: ".len() + 100);
    }

    #[test]
    fn test_parse_unknown_winner_is_tie() {
        let v = parse_verdict(r#"{"winner": "C", "reason": "?"}"#);
        assert_eq!(v.winner, Winner::Tie);
        assert!(v.reason.starts_with("Could not parse response"));
    }

    #[tokio::test]
    async fn test_critique_uses_low_temperature() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|req: &GenerationRequest| req.temperature == 0.1 && req.user.contains("Answer B:\nsecond"))
            .returning(|_| {
                Ok(Generation {
                    text: r#"{"winner": "A", "reason": "clearer"}"#.to_string(),
                    model: None,
                })
            });
        let v = critique(&mock, "first", "second", "clarity").await;
        assert_eq!(v.winner, Winner::A);
    }

    #[tokio::test]
    async fn test_critique_generation_failure_is_tie() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(GenerationError::EmptyResponse));
        let v = critique(&mock, "a", "b", "clarity").await;
        assert_eq!(v.winner, Winner::Tie);
    }
}
