//! Built-in food catalogue shown on the static dashboard.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::MealType;

const BUILTIN_CATALOGUE: &str = include_str!("../data/catalogue.json");

/// Timestamp format used by the catalogue data.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}

/// One food with its nutrition facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: u32,
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    /// mg
    pub sodium: f64,
    /// mg
    pub potassium: f64,
    #[serde(default)]
    pub vitamins: Vec<String>,
    #[serde(default)]
    pub minerals: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub drawbacks: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    pub meal_type: MealType,
    pub glycemic_index: String,
    pub satiety_index: String,
    pub processing_level: String,
    #[serde(default)]
    pub allergen_info: Vec<String>,
    pub portion_size: String,
    pub serving_weight: String,
    pub health_score: f64,
    pub nutrient_density_score: f64,
}

/// Sums shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CatalogueTotals {
    pub calories: u64,
    pub protein: f64,
    pub carbs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    entries: Vec<FoodEntry>,
}

impl Catalogue {
    /// The catalogue compiled into the binary.
    ///
    /// # Errors
    /// Returns an error if the embedded data does not parse.
    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Parse a catalogue from a JSON array of entries.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid entry list.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn totals(&self) -> CatalogueTotals {
        self.entries
            .iter()
            .fold(CatalogueTotals::default(), |acc, food| CatalogueTotals {
                calories: acc.calories + u64::from(food.calories),
                protein: acc.protein + food.protein,
                carbs: acc.carbs + food.carbs,
            })
    }
}
