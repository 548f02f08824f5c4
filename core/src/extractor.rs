//! Rule-based profile extraction from a free-text message.
//!
//! Matching is literal substring search over ordered rule tables. English
//! keywords are matched against the lowercased message; Persian keywords are
//! unaffected by lowercasing.

use crate::profile::{FarmerProfile, IrrigationType, WaterLevel};
use crate::reference::CROP_CATALOG;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Keyword groups tried in priority order; the first group with a hit wins.
pub const IRRIGATION_RULES: &[(IrrigationType, &[&str])] = &[
    (IrrigationType::Drip, &["قطره", "drip"]),
    (IrrigationType::Sprinkler, &["بارانی", "sprinkler"]),
    (IrrigationType::Flood, &["غرقابی", "flood"]),
];

/// Water-level keyword groups in priority order. No hit means `Medium`.
pub const WATER_LEVEL_RULES: &[(WaterLevel, &[&str])] = &[
    (WaterLevel::Low, &["کم", "محدود", "low", "limited"]),
    (WaterLevel::High, &["زیاد", "کافی", "high", "sufficient"]),
];

/// Region name and the literals that identify it, in priority order.
/// Latin aliases only match as whole words.
pub const REGION_RULES: &[(&str, &[&str])] = &[
    ("خراسان", &["خراسان", "khorasan"]),
    ("اصفهان", &["اصفهان", "isfahan", "esfahan"]),
    ("فارس", &["فارس", "fars"]),
];

const NUMBER: &str = r"([\d۰-۹٠-٩]+(?:[.٫][\d۰-۹٠-٩]*)?)";

/// Land-size patterns in priority order; the first that parses wins.
static LAND_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"{NUMBER}\s*هکتار"),
        format!(r"(?i){NUMBER}\s*hectare"),
        format!(r"(?i){NUMBER}\s*ha\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("land-size pattern is valid"))
    .collect()
});

static REGION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    REGION_RULES
        .iter()
        .map(|(region, aliases)| {
            let alternatives: Vec<String> = aliases
                .iter()
                .map(|alias| {
                    if alias.is_ascii() {
                        format!(r"\b{}\b", regex::escape(alias))
                    } else {
                        regex::escape(alias)
                    }
                })
                .collect();
            let pattern = format!("(?i){}", alternatives.join("|"));
            (*region, Regex::new(&pattern).expect("region pattern is valid"))
        })
        .collect()
});

/// Apply one message to the prior profile (or a fresh one for `farmer_id`).
///
/// Field policy:
/// - crops: replaced when at least one crop is found
/// - irrigation, land size, region: replaced on a match, otherwise kept
/// - water level: re-evaluated every message, `Medium` when nothing matches
pub fn extract_profile(farmer_id: &str, prior: Option<FarmerProfile>, message: &str) -> FarmerProfile {
    let mut profile = prior.unwrap_or_else(|| FarmerProfile::new(farmer_id));
    let lowered = message.to_lowercase();

    let crops = detect_crops(&lowered);
    if !crops.is_empty() {
        profile.main_crops = crops;
    }

    if let Some(irrigation) = first_group_match(IRRIGATION_RULES, &lowered) {
        profile.irrigation_type = irrigation;
    }

    profile.water_level = first_group_match(WATER_LEVEL_RULES, &lowered).unwrap_or(WaterLevel::Medium);

    if let Some(ha) = detect_land_size(message) {
        profile.land_size_ha = Some(ha);
    }

    if let Some(region) = detect_region(message) {
        profile.region = Some(region.to_string());
    }

    debug!(
        farmer = %profile.farmer_id,
        crops = ?profile.main_crops,
        irrigation = %profile.irrigation_type,
        water = %profile.water_level,
        land_ha = ?profile.land_size_ha,
        region = ?profile.region,
        "Extracted profile"
    );

    profile
}

fn first_group_match<T: Copy>(rules: &[(T, &[&str])], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(value, _)| *value)
}

/// First region whose aliases appear in `text`.
pub fn detect_region(text: &str) -> Option<&'static str> {
    REGION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(region, _)| *region)
}

/// Canonical crop ids mentioned in `text`, in catalogue order.
///
/// Longer aliases are matched first and blanked out so that a name contained
/// in another ("سیب" in "سیب زمینی") is not counted twice.
pub fn detect_crops(text: &str) -> Vec<String> {
    let mut aliases: Vec<(usize, &str)> = CROP_CATALOG
        .iter()
        .enumerate()
        .flat_map(|(idx, spec)| spec.aliases.iter().map(move |a| (idx, *a)))
        .collect();
    aliases.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));

    let mut remaining = text.to_string();
    let mut found = vec![false; CROP_CATALOG.len()];
    for (idx, alias) in aliases {
        if remaining.contains(alias) {
            found[idx] = true;
            remaining = remaining.replace(alias, " ");
        }
    }

    CROP_CATALOG
        .iter()
        .zip(found)
        .filter(|(_, hit)| *hit)
        .map(|(spec, _)| spec.id.to_string())
        .collect()
}

/// Land size in hectares from the first land pattern whose number parses.
pub fn detect_land_size(text: &str) -> Option<f64> {
    LAND_PATTERNS.iter().find_map(|pattern| {
        let raw = pattern.captures(text)?.get(1)?.as_str();
        normalize_digits(raw).trim_end_matches('.').parse::<f64>().ok()
    })
}

/// Map Persian / Arabic-Indic digits and the Persian decimal mark to ASCII.
fn normalize_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            '٫' => '.',
            other => other,
        })
        .collect()
}
