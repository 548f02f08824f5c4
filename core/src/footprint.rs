//! Water-footprint calculator.
//!
//! volume(crop) = ETc(crop) × area / efficiency(irrigation)

use crate::profile::IrrigationType;
use crate::reference::{self, HIGH_WATER_CROPS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crop id -> allocated area in hectares
pub type CropMix = BTreeMap<String, f64>;

/// Per-crop and total seasonal water use for a crop mix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterFootprint {
    pub crop_water_m3: BTreeMap<String, f64>,
    pub total_water_m3: f64,
    pub recommended_switches: Vec<String>,
    pub assumptions: String,
}

impl WaterFootprint {
    /// Result for a profile with no crops
    pub fn empty() -> Self {
        Self {
            assumptions: "No crops specified.".to_string(),
            ..Default::default()
        }
    }

    /// Crop with the single highest volume; ties keep the earliest in `order`.
    pub fn largest_consumer<'a>(&self, order: &'a [String]) -> Option<&'a str> {
        let mut best: Option<(&str, f64)> = None;
        for crop in order {
            let Some(&volume) = self.crop_water_m3.get(crop) else {
                continue;
            };
            if best.map_or(true, |(_, v)| volume > v) {
                best = Some((crop.as_str(), volume));
            }
        }
        best.map(|(crop, _)| crop)
    }
}

/// Compute the water footprint of `crop_mix` under `irrigation`.
///
/// Unknown crops use the catalogue fallback ETc; this never fails.
pub fn calculate_water_footprint(crop_mix: &CropMix, irrigation: IrrigationType) -> WaterFootprint {
    let efficiency = reference::irrigation_efficiency(irrigation);

    let crop_water_m3: BTreeMap<String, f64> = crop_mix
        .iter()
        .map(|(crop, &area)| (crop.clone(), reference::et_c(crop) * area / efficiency))
        .collect();
    let total_water_m3 = crop_water_m3.values().sum();

    let mut recommended_switches: Vec<String> = HIGH_WATER_CROPS
        .iter()
        .filter(|crop| crop_mix.get(**crop).is_some_and(|&area| area > 0.0))
        .map(|crop| {
            format!("Reducing {crop} cultivation area can significantly reduce water consumption")
        })
        .collect();

    match irrigation {
        IrrigationType::Flood => recommended_switches
            .push("Switching to drip irrigation can reduce water use by up to 40%".to_string()),
        IrrigationType::Unknown => recommended_switches
            .push("Improving irrigation system can reduce water consumption".to_string()),
        _ => {}
    }

    let assumptions = format!(
        "Assumed irrigation efficiency for {} is {:.0}%. ETc values are based on average regional data.",
        irrigation,
        efficiency * 100.0
    );

    WaterFootprint {
        crop_water_m3,
        total_water_m3,
        recommended_switches,
        assumptions,
    }
}
