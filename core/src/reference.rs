//! Static reference tables: crop water demand, irrigation efficiency and the
//! conservation tip corpus.
//!
//! ETc values are seasonal crop evapotranspiration in m³/ha (approximate
//! regional averages).

use crate::profile::IrrigationType;
use serde::Serialize;

/// ETc used for crops missing from the catalogue
pub const FALLBACK_ET_C: f64 = 6000.0;

/// Efficiency assumed when the irrigation method is not known
pub const UNKNOWN_IRRIGATION_EFFICIENCY: f64 = 0.60;

/// Crops whose presence always triggers an area-reduction advisory
pub const HIGH_WATER_CROPS: &[&str] = &["rice"];

/// Reference crop halved by the water-saving scenario when present
pub const HIGH_WATER_REFERENCE_CROP: &str = "rice";

/// Citation attached to every tip selection
pub const TIP_SOURCE: &str = "AabSmart Farmer Knowledge Base - Water Conservation Tips";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Summer,
    Perennial,
}

/// One crop in the catalogue.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CropSpec {
    /// Canonical (English) id stored in profiles
    pub id: &'static str,
    pub et_c: f64,
    pub season: Season,
    /// Literal names recognised in messages, English (lowercase) and Persian
    pub aliases: &'static [&'static str],
}

pub const CROP_CATALOG: &[CropSpec] = &[
    CropSpec { id: "wheat", et_c: 3500.0, season: Season::Winter, aliases: &["wheat", "گندم"] },
    CropSpec { id: "barley", et_c: 3200.0, season: Season::Winter, aliases: &["barley", "جو"] },
    CropSpec { id: "rice", et_c: 12000.0, season: Season::Summer, aliases: &["rice", "برنج"] },
    CropSpec { id: "pistachio", et_c: 8500.0, season: Season::Perennial, aliases: &["pistachio", "پسته"] },
    CropSpec { id: "tomato", et_c: 6000.0, season: Season::Summer, aliases: &["tomato", "گوجه فرنگی", "گوجه"] },
    CropSpec { id: "cucumber", et_c: 5500.0, season: Season::Summer, aliases: &["cucumber", "خیار"] },
    CropSpec { id: "corn", et_c: 7000.0, season: Season::Summer, aliases: &["corn", "maize", "ذرت"] },
    CropSpec { id: "apple", et_c: 7500.0, season: Season::Perennial, aliases: &["apple", "سیب"] },
    CropSpec { id: "eggplant", et_c: 5800.0, season: Season::Summer, aliases: &["eggplant", "بادمجان", "بادنجان"] },
    CropSpec { id: "pepper", et_c: 5200.0, season: Season::Summer, aliases: &["pepper", "فلفل"] },
    CropSpec { id: "potato", et_c: 5000.0, season: Season::Summer, aliases: &["potato", "سیب زمینی", "سیب‌زمینی"] },
    CropSpec { id: "onion", et_c: 4500.0, season: Season::Summer, aliases: &["onion", "پیاز"] },
];

/// Look up a crop by canonical id.
pub fn crop(id: &str) -> Option<&'static CropSpec> {
    CROP_CATALOG.iter().find(|c| c.id == id)
}

/// Seasonal ETc for a crop, falling back to [`FALLBACK_ET_C`].
pub fn et_c(crop_id: &str) -> f64 {
    crop(crop_id).map(|c| c.et_c).unwrap_or(FALLBACK_ET_C)
}

/// Fraction of applied water the crop actually uses.
pub fn irrigation_efficiency(irrigation: IrrigationType) -> f64 {
    match irrigation {
        IrrigationType::Flood => 0.50,
        IrrigationType::Sprinkler => 0.75,
        IrrigationType::Drip => 0.90,
        IrrigationType::Unknown => UNKNOWN_IRRIGATION_EFFICIENCY,
    }
}

/// A water-conservation tip with its keyword tags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tip {
    pub id: u32,
    pub title: &'static str,
    pub summary: &'static str,
    pub keywords: &'static [&'static str],
}

pub const TIP_CORPUS: &[Tip] = &[
    Tip {
        id: 1,
        title: "Irrigate at Optimal Times",
        summary: "Irrigating in early morning or evening reduces water evaporation. Avoid irrigation during hot midday hours.",
        keywords: &["irrigation", "time", "evaporation", "morning", "evening", "آبیاری", "صبح", "عصر"],
    },
    Tip {
        id: 2,
        title: "Use Mulching",
        summary: "Using mulch (straw, dry leaves) around plants helps retain soil moisture and reduces irrigation needs.",
        keywords: &["mulch", "moisture", "soil", "reduce irrigation", "مالچ", "رطوبت"],
    },
    Tip {
        id: 3,
        title: "Plant Drought-Resistant Varieties",
        summary: "Choosing drought-resistant and low-water crop varieties can reduce irrigation needs by up to 30%.",
        keywords: &["resistant", "drought", "varieties", "reduce water", "کم آب", "خشکسالی", "مقاوم"],
    },
    Tip {
        id: 4,
        title: "Drip Irrigation",
        summary: "Drip irrigation systems deliver water directly to plant roots and prevent water waste.",
        keywords: &["drip", "roots", "waste", "efficiency", "قطره"],
    },
    Tip {
        id: 5,
        title: "Soil Management",
        summary: "Adding organic matter to soil improves water retention capacity and reduces irrigation needs.",
        keywords: &["soil", "organic matter", "water retention", "compost", "خاک", "کود"],
    },
    Tip {
        id: 6,
        title: "Crop Rotation",
        summary: "Rotating crops with low-water plants can reduce pressure on water resources.",
        keywords: &["rotation", "crops", "low-water", "resources", "تناوب"],
    },
    Tip {
        id: 7,
        title: "Monitor Soil Moisture",
        summary: "Using a moisture meter or simple methods to check soil moisture before irrigation prevents unnecessary watering.",
        keywords: &["moisture", "soil", "monitoring", "irrigation", "رطوبت"],
    },
    Tip {
        id: 8,
        title: "Optimal Planting Density",
        summary: "Planting at appropriate density optimizes water use and reduces competition between plants.",
        keywords: &["density", "planting", "optimal", "competition", "تراکم"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        for (i, a) in CROP_CATALOG.iter().enumerate() {
            for b in &CROP_CATALOG[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_unknown_crop_uses_fallback() {
        assert_eq!(et_c("rice"), 12000.0);
        assert_eq!(et_c("saffron"), FALLBACK_ET_C);
    }

    #[test]
    fn test_efficiency_table() {
        assert_eq!(irrigation_efficiency(IrrigationType::Drip), 0.90);
        assert_eq!(
            irrigation_efficiency(IrrigationType::parse("canal")),
            UNKNOWN_IRRIGATION_EFFICIENCY
        );
    }

    #[test]
    fn test_reference_crop_in_catalog() {
        assert!(crop(HIGH_WATER_REFERENCE_CROP).is_some());
        for c in HIGH_WATER_CROPS {
            assert!(crop(c).is_some());
        }
    }
}
