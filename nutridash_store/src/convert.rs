use chrono::{NaiveDateTime, Utc};
use nutridash_core::{FoodEntry, FoodItem};
use nutridash_entities::food_items;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::{Error, Result};

/// Values for a food item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewFood {
    pub name: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub iron: f64,
    pub calcium: f64,
    pub magnesium: f64,
    pub zinc: f64,
    pub potassium: f64,
    pub benefits: Vec<String>,
    pub drawbacks: Vec<String>,
    pub alternatives: Vec<String>,
    /// Defaults to now.
    pub timestamp: Option<NaiveDateTime>,
}

impl NewFood {
    pub(crate) fn into_active_model(self) -> Result<food_items::ActiveModel> {
        Ok(food_items::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            calories: Set(self.calories),
            protein: Set(self.protein),
            carbs: Set(self.carbs),
            fat: Set(self.fat),
            fiber: Set(self.fiber),
            iron: Set(self.iron),
            calcium: Set(self.calcium),
            magnesium: Set(self.magnesium),
            zinc: Set(self.zinc),
            potassium: Set(self.potassium),
            benefits: Set(serde_json::to_string(&self.benefits)?),
            drawbacks: Set(serde_json::to_string(&self.drawbacks)?),
            alternatives: Set(serde_json::to_string(&self.alternatives)?),
            timestamp: Set(self.timestamp.unwrap_or_else(|| Utc::now().naive_utc())),
        })
    }
}

/// The catalogue only tracks potassium in mg; other minerals start at zero.
impl TryFrom<&FoodEntry> for NewFood {
    type Error = Error;

    fn try_from(entry: &FoodEntry) -> Result<Self> {
        let calories = i32::try_from(entry.calories).map_err(|_| Error::CaloriesOutOfRange {
            name: entry.name.clone(),
            calories: entry.calories,
        })?;

        Ok(Self {
            name: entry.name.clone(),
            calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            fiber: entry.fiber,
            potassium: entry.potassium,
            benefits: entry.benefits.clone(),
            drawbacks: entry.drawbacks.clone(),
            alternatives: entry.alternatives.clone(),
            timestamp: Some(entry.timestamp),
            ..Self::default()
        })
    }
}

pub fn food_item_from_model(m: food_items::Model) -> Result<FoodItem> {
    Ok(FoodItem {
        id: m.id,
        name: m.name,
        calories: m.calories,
        protein: m.protein,
        carbs: m.carbs,
        fat: m.fat,
        fiber: m.fiber,
        iron: m.iron,
        calcium: m.calcium,
        magnesium: m.magnesium,
        zinc: m.zinc,
        potassium: m.potassium,
        benefits: list_from_column(&m.benefits)?,
        drawbacks: list_from_column(&m.drawbacks)?,
        alternatives: list_from_column(&m.alternatives)?,
        timestamp: m.timestamp,
    })
}

fn list_from_column(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_column_is_empty_list() {
        assert!(matches!(list_from_column(""), Ok(v) if v.is_empty()));
    }

    #[test]
    fn test_bad_column_is_error() {
        assert!(list_from_column("not json").is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_catalogue_entry_conversion() {
        let catalogue = nutridash_core::Catalogue::builtin().expect("catalogue should parse");
        let entry = &catalogue.entries()[1];
        let food = NewFood::try_from(entry).expect("catalogue calories fit the column");
        assert_eq!(food.name, "Chicken and Rice Bowl");
        assert_eq!(food.calories, 520);
        assert_eq!(food.timestamp, Some(entry.timestamp));
        assert!((food.iron - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_oversized_calories_rejected() {
        let catalogue = nutridash_core::Catalogue::builtin().expect("catalogue should parse");
        let mut entry = catalogue.entries()[0].clone();
        entry.calories = u32::MAX;

        let err = NewFood::try_from(&entry).expect_err("calories exceed the column range");
        assert!(matches!(
            err,
            Error::CaloriesOutOfRange { calories: u32::MAX, .. }
        ));
    }
}
