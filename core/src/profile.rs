//! Farmer profile and the categorical attributes extracted from messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Irrigation method used on the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationType {
    Flood,
    Drip,
    Sprinkler,
    #[default]
    Unknown,
}

impl IrrigationType {
    /// Lenient parse: any unrecognised label is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "flood" => Self::Flood,
            "drip" => Self::Drip,
            "sprinkler" => Self::Sprinkler,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Drip => "drip",
            Self::Sprinkler => "sprinkler",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IrrigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Water availability reported by the farmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl WaterLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for WaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-known attributes of one farmer.
///
/// Created on the first message from an unseen farmer id and mutated in place
/// on every later message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub farmer_id: String,
    pub region: Option<String>,
    pub land_size_ha: Option<f64>,
    /// Canonical crop ids, deduplicated, in catalogue order
    pub main_crops: Vec<String>,
    pub irrigation_type: IrrigationType,
    pub water_level: WaterLevel,
    pub last_updated: DateTime<Utc>,
}

impl FarmerProfile {
    pub fn new(farmer_id: impl Into<String>) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            region: None,
            land_size_ha: None,
            main_crops: Vec::new(),
            irrigation_type: IrrigationType::Unknown,
            water_level: WaterLevel::Medium,
            last_updated: Utc::now(),
        }
    }

    /// Land size to plan with: the stated size or the given fallback.
    pub fn effective_land_ha(&self, default_ha: f64) -> f64 {
        self.land_size_ha.unwrap_or(default_ha)
    }

    /// Even split of the effective land size across `main_crops`.
    pub fn even_crop_mix(&self, default_ha: f64) -> crate::footprint::CropMix {
        if self.main_crops.is_empty() {
            return crate::footprint::CropMix::new();
        }
        let per_crop = self.effective_land_ha(default_ha) / self.main_crops.len() as f64;
        self.main_crops
            .iter()
            .map(|crop| (crop.clone(), per_crop))
            .collect()
    }
}
