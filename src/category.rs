use std::{fmt, sync::OnceLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::brand::BrandVocabulary;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    GasStations,
    Supermarkets,
    Cafes,
    Cemeteries,
    DrinkingWater,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Category {
    pub fn all() -> Vec<Self> {
        vec![
            Self::GasStations,
            Self::Supermarkets,
            Self::Cafes,
            Self::Cemeteries,
            Self::DrinkingWater,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GasStations => "Gas Stations",
            Self::Supermarkets => "Supermarkets",
            Self::Cafes => "Cafes/Bakeries",
            Self::Cemeteries => "Cemeteries",
            Self::DrinkingWater => "Drinking Water",
        }
    }

    /// File stem of the persisted data file; the map client imports by
    /// these names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::GasStations => "gasStations",
            Self::Supermarkets => "supermarkets",
            Self::Cafes => "cafes",
            Self::Cemeteries => "cemeteries",
            Self::DrinkingWater => "drinkingWater",
        }
    }

    /// Overpass selectors, unioned within one query.
    pub fn selectors(&self) -> &'static [&'static str] {
        match self {
            Self::GasStations => &["nwr[amenity=fuel](area)"],
            Self::Supermarkets => &["nwr[shop~\"beverages|convenience|supermarket\"](area)"],
            Self::Cafes => &[
                "nwr[amenity~\"cafe|ice_cream\"](area)",
                "nwr[shop~\"bakery|ice_cream|pastry\"](area)",
            ],
            Self::Cemeteries => &[
                "nwr[landuse=cemetery](area)",
                "nwr[amenity=grave_yard](area)",
            ],
            Self::DrinkingWater => &["nwr[amenity~\"drinking_water|water_point\"](area)"],
        }
    }

    /// Transitive-merge radius for categories where overlapping queries
    /// return several records of one physical place.
    pub fn merge_radius_km(&self) -> Option<f64> {
        match self {
            Self::Cemeteries => Some(0.5),
            _ => None,
        }
    }

    /// Keyword table for picking the canonical name of a merged group,
    /// most specific first. Order matters: earlier keywords outrank
    /// later ones.
    pub fn name_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Cemeteries => &["friedhof", "cemetery"],
            Self::Cafes => &["bäckerei", "bakery", "konditorei", "café", "cafe"],
            _ => &[],
        }
    }

    /// Brand-keyed categories keep only records that resolve to a
    /// canonical brand.
    pub fn brands(&self) -> Option<&'static BrandVocabulary> {
        static GAS_STATIONS: OnceLock<BrandVocabulary> = OnceLock::new();
        match self {
            Self::GasStations => Some(GAS_STATIONS.get_or_init(BrandVocabulary::builtin)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_match_client_imports() {
        for category in Category::all() {
            assert!(!category.selectors().is_empty());
        }
        assert_eq!(Category::GasStations.slug(), "gasStations");
        assert_eq!(Category::DrinkingWater.slug(), "drinkingWater");
    }

    #[test]
    fn only_gas_stations_are_brand_keyed() {
        assert!(Category::GasStations.brands().is_some());
        assert!(Category::Cemeteries.brands().is_none());
    }
}
