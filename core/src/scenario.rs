//! Comparative land-use scenarios: an even-split baseline and a
//! reduced-consumption variant derived from it.

use crate::footprint::{calculate_water_footprint, CropMix, WaterFootprint};
use crate::profile::FarmerProfile;
use crate::reference::HIGH_WATER_REFERENCE_CROP;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Share of the reference crop's area kept in the water-saving scenario
const REFERENCE_CROP_KEEP: f64 = 0.5;

/// Share of the largest consumer's area removed when the reference crop is absent
const LARGEST_CONSUMER_CUT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Conservative,
    WaterSaving,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conservative => f.write_str("conservative"),
            Self::WaterSaving => f.write_str("water_saving"),
        }
    }
}

/// A fully specified crop-mix alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: ScenarioKind,
    pub crop_mix: CropMix,
    pub total_water_m3: f64,
    /// Reduction against the conservative total, in percent
    pub savings_pct: f64,
    pub assumptions: String,
}

/// Build the conservative and water-saving scenarios for `profile`.
///
/// Returns an empty vector when the profile lists no crops. `baseline` is the
/// footprint of the even split and decides the largest consumer.
pub fn generate_scenarios(
    profile: &FarmerProfile,
    baseline: &WaterFootprint,
    default_land_ha: f64,
) -> Vec<Scenario> {
    if profile.main_crops.is_empty() {
        return Vec::new();
    }

    let conservative_mix = profile.even_crop_mix(default_land_ha);
    let conservative_total =
        calculate_water_footprint(&conservative_mix, profile.irrigation_type).total_water_m3;

    let (saving_mix, saving_note) = water_saving_mix(profile, &conservative_mix, baseline);
    let saving_total =
        calculate_water_footprint(&saving_mix, profile.irrigation_type).total_water_m3;

    let savings_pct = if conservative_total > 0.0 {
        (conservative_total - saving_total) / conservative_total * 100.0
    } else {
        0.0
    };

    debug!(
        farmer = %profile.farmer_id,
        conservative_m3 = conservative_total,
        water_saving_m3 = saving_total,
        savings_pct,
        "Generated scenarios"
    );

    vec![
        Scenario {
            name: ScenarioKind::Conservative,
            crop_mix: conservative_mix,
            total_water_m3: conservative_total,
            savings_pct: 0.0,
            assumptions: "Land divided equally between the listed crops.".to_string(),
        },
        Scenario {
            name: ScenarioKind::WaterSaving,
            crop_mix: saving_mix,
            total_water_m3: saving_total,
            savings_pct,
            assumptions: saving_note,
        },
    ]
}

fn water_saving_mix(
    profile: &FarmerProfile,
    base: &CropMix,
    baseline: &WaterFootprint,
) -> (CropMix, String) {
    let mut mix = base.clone();

    let (target, keep, rule) = if mix.contains_key(HIGH_WATER_REFERENCE_CROP) {
        (
            HIGH_WATER_REFERENCE_CROP,
            REFERENCE_CROP_KEEP,
            format!("{HIGH_WATER_REFERENCE_CROP} area halved"),
        )
    } else {
        match baseline.largest_consumer(&profile.main_crops) {
            Some(crop) if mix.contains_key(crop) => (
                crop,
                1.0 - LARGEST_CONSUMER_CUT,
                format!("{crop} (largest water consumer) area reduced by 30%"),
            ),
            _ => return (mix, "No reduction applied.".to_string()),
        }
    };

    let freed = match mix.get_mut(target) {
        Some(area) => {
            let freed = *area * (1.0 - keep);
            *area -= freed;
            freed
        }
        None => 0.0,
    };

    let others: Vec<&String> = profile
        .main_crops
        .iter()
        .filter(|crop| crop.as_str() != target)
        .collect();

    let note = if others.is_empty() {
        format!("{rule}; freed land left unplanted.")
    } else {
        let share = freed / others.len() as f64;
        for crop in others {
            *mix.entry(crop.clone()).or_insert(0.0) += share;
        }
        format!("{rule}; freed land shared equally by the other crops.")
    };

    (mix, note)
}
