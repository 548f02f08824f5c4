use crate::advisor::Advisor;
use serde::Serialize;
use tracing::info;

/// A fixed turn with keywords a good answer should mention
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GoldenCase {
    pub id: &'static str,
    pub farmer_id: &'static str,
    pub user_message: &'static str,
    pub expected_keywords: &'static [&'static str],
    pub description: &'static str,
}

pub const GOLDEN_CASES: &[GoldenCase] = &[
    GoldenCase {
        id: "test_1",
        farmer_id: "farmer_001",
        user_message: "سلام. من ۵ هکتار زمین دارم و گندم و جو می‌کارم. آب محدود است.",
        expected_keywords: &["گندم", "جو", "آب"],
        description: "Basic wheat and barley farmer with limited water",
    },
    GoldenCase {
        id: "test_2",
        farmer_id: "farmer_002",
        user_message: "I have 3 hectares with rice and tomato. Water is low. Using flood irrigation.",
        expected_keywords: &["rice", "tomato", "water"],
        description: "High-water crops with flood irrigation",
    },
    GoldenCase {
        id: "test_3",
        farmer_id: "farmer_003",
        user_message: "من در اصفهان هستم. پسته و گوجه فرنگی دارم. آبیاری قطره‌ای استفاده می‌کنم.",
        expected_keywords: &["پسته", "گوجه فرنگی", "قطره"],
        description: "Pistachio and tomato with drip irrigation",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenResult {
    pub test_id: String,
    /// At least one expected keyword appeared in the answer
    pub passed: bool,
    pub keywords_found: Vec<String>,
    pub profile_extracted: bool,
    pub water_footprint_calculated: bool,
    pub scenarios_generated: bool,
    pub generation_failed: bool,
    pub answer_length: usize,
}

/// Run every golden case on a clean slate for its farmer id.
pub async fn run_golden(advisor: &Advisor) -> Vec<GoldenResult> {
    let mut results = Vec::with_capacity(GOLDEN_CASES.len());

    for case in GOLDEN_CASES {
        advisor.reset_farmer(case.farmer_id).await;
        let turn = advisor.run_turn(case.farmer_id, case.user_message).await;

        let answer = turn.answer.text();
        let lowered = answer.to_lowercase();
        let keywords_found: Vec<String> = case
            .expected_keywords
            .iter()
            .filter(|kw| lowered.contains(&kw.to_lowercase()) || answer.contains(**kw))
            .map(|kw| kw.to_string())
            .collect();

        let result = GoldenResult {
            test_id: case.id.to_string(),
            passed: !keywords_found.is_empty(),
            keywords_found,
            profile_extracted: !turn.profile.main_crops.is_empty(),
            water_footprint_calculated: turn.water_footprint.total_water_m3 > 0.0,
            scenarios_generated: !turn.scenarios.is_empty(),
            generation_failed: turn.answer.is_failed(),
            answer_length: answer.chars().count(),
        };
        info!(
            case = case.id,
            passed = result.passed,
            keywords = ?result.keywords_found,
            "Golden case finished"
        );
        results.push(result);
    }

    results
}
