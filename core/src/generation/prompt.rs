//! Prompt text for the coach answer.

use crate::footprint::WaterFootprint;
use crate::profile::FarmerProfile;
use crate::scenario::Scenario;
use crate::tips::TipSelection;
use std::fmt::Write;

/// Tips included in the coach context at most
const CONTEXT_TIPS: usize = 3;

pub const COACH_SYSTEM_PROMPT: &str = "You are AabSmart Farmer, a bilingual agricultural advisor helping small farmers in water-limited conditions.

Your role:
- Provide practical, actionable advice in Persian (Farsi) first
- Follow with a short English summary (2-3 sentences)
- Focus on water conservation and crop management
- Be empathetic, clear, and culturally appropriate
- Do NOT output JSON or internal field names
- Do NOT make political or governance commentary

Output format:
SECTION 1: [Persian explanation - detailed, practical guidance]
SECTION 2: [English summary - 2-3 sentences]

Keep responses focused on agricultural advice only.";

/// Structured summary of the turn handed to the coach.
pub fn build_coach_context(
    profile: &FarmerProfile,
    footprint: &WaterFootprint,
    tips: &TipSelection,
    scenarios: &[Scenario],
    user_message: &str,
) -> String {
    let not_specified = "Not specified";
    let mut out = String::new();

    // writing to a String cannot fail
    let _ = writeln!(out, "Farmer Profile:");
    let _ = writeln!(out, "- Region: {}", profile.region.as_deref().unwrap_or(not_specified));
    let _ = writeln!(
        out,
        "- Land size: {} hectares",
        profile
            .land_size_ha
            .map(|ha| ha.to_string())
            .unwrap_or_else(|| not_specified.to_string())
    );
    let _ = writeln!(
        out,
        "- Main crops: {}",
        if profile.main_crops.is_empty() {
            not_specified.to_string()
        } else {
            profile.main_crops.join(", ")
        }
    );
    let _ = writeln!(out, "- Irrigation type: {}", profile.irrigation_type);
    let _ = writeln!(out, "- Water level: {}", profile.water_level);

    let _ = writeln!(out, "\nWater Footprint Analysis:");
    let _ = writeln!(out, "- Total water use: {:.0} m³", footprint.total_water_m3);
    for (crop, water) in &footprint.crop_water_m3 {
        let _ = writeln!(out, "  - {crop}: {water:.0} m³");
    }
    for switch in &footprint.recommended_switches {
        let _ = writeln!(out, "- Suggestion: {switch}");
    }

    let _ = writeln!(out, "\nAgronomy Tips:");
    for scored in tips.tips.iter().take(CONTEXT_TIPS) {
        let _ = writeln!(out, "- {}: {}", scored.tip.title, scored.tip.summary);
    }

    let _ = writeln!(out, "\nScenarios:");
    for scenario in scenarios {
        let _ = writeln!(
            out,
            "- {}: {:.0} m³ (savings: {:.1}%)",
            scenario.name, scenario.total_water_m3, scenario.savings_pct
        );
    }

    let _ = write!(out, "\nUser Message: {user_message}");
    out
}

/// Wrap the context in the coach instructions.
pub fn build_coach_prompt(context: &str) -> String {
    format!(
        "Based on the following information, provide bilingual agricultural advice:

{context}

Remember:
- SECTION 1: Detailed Persian explanation with practical tips
- SECTION 2: Short English summary (2-3 sentences)
- Focus on water conservation and actionable recommendations
- Be empathetic and culturally appropriate"
    )
}
