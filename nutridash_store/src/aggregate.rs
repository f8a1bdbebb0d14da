//! Dashboard aggregates over stored rows.

use nutridash_core::{MealType, NutritionStats};
use nutridash_entities::food_items;
use tracing::debug;

/// Recommended daily intake in mg for iron, calcium, magnesium, zinc and
/// potassium, in chart order.
pub const DAILY_VALUES_MG: [f64; 5] = [18.0, 1000.0, 400.0, 11.0, 3500.0];

/// Column sums. All zeros for an empty table.
#[must_use]
pub fn nutrition_stats(foods: &[food_items::Model]) -> NutritionStats {
    foods
        .iter()
        .fold(NutritionStats::default(), |acc, f| NutritionStats {
            total_calories: acc.total_calories + i64::from(f.calories),
            total_protein: acc.total_protein + f.protein,
            total_carbs: acc.total_carbs + f.carbs,
            total_fat: acc.total_fat + f.fat,
            total_fiber: acc.total_fiber + f.fiber,
        })
}

/// Calories per meal type in [`MealType::ALL`] order. Rows with an unknown
/// meal type are skipped.
pub fn meal_distribution<'a>(rows: impl IntoIterator<Item = (&'a str, i32)>) -> [i64; 4] {
    let mut calories = [0i64; 4];
    for (meal_type, kcal) in rows {
        match meal_type.parse::<MealType>() {
            Ok(meal) => calories[meal.index()] += i64::from(kcal),
            Err(e) => debug!("Skipping meal log: {e}"),
        }
    }
    calories
}

/// Average mineral content as a percentage of the daily value.
#[must_use]
pub fn mineral_intake(foods: &[food_items::Model]) -> [f64; 5] {
    if foods.is_empty() {
        return [0.0; 5];
    }

    let count = foods.len() as f64;
    let mut sums = [0.0f64; 5];
    for f in foods {
        for (sum, value) in sums
            .iter_mut()
            .zip([f.iron, f.calcium, f.magnesium, f.zinc, f.potassium])
        {
            *sum += value;
        }
    }

    let mut percent = [0.0f64; 5];
    for ((out, sum), daily) in percent.iter_mut().zip(sums).zip(DAILY_VALUES_MG) {
        *out = sum / count / daily * 100.0;
    }
    percent
}

/// Protein, carbs and fat as percentages of their combined grams.
#[must_use]
pub fn macronutrient_distribution(foods: &[food_items::Model]) -> [f64; 3] {
    let stats = nutrition_stats(foods);
    let total = stats.total_protein + stats.total_carbs + stats.total_fat;
    if total.abs() < f64::EPSILON {
        return [0.0; 3];
    }
    [
        stats.total_protein / total * 100.0,
        stats.total_carbs / total * 100.0,
        stats.total_fat / total * 100.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::prelude::DateTime;

    fn food(calories: i32, protein: f64, carbs: f64, fat: f64) -> food_items::Model {
        food_items::Model {
            id: 0,
            name: "test".to_string(),
            calories,
            protein,
            carbs,
            fat,
            fiber: 1.0,
            iron: 9.0,
            calcium: 500.0,
            magnesium: 0.0,
            zinc: 11.0,
            potassium: 350.0,
            benefits: "[]".to_string(),
            drawbacks: "[]".to_string(),
            alternatives: "[]".to_string(),
            timestamp: DateTime::default(),
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "Sums of small integers are exact")]
    fn test_stats_sum_columns() {
        let stats = nutrition_stats(&[food(350, 15.0, 42.0, 16.0), food(520, 35.0, 65.0, 12.0)]);
        assert_eq!(stats.total_calories, 870);
        assert_eq!(stats.total_protein, 50.0);
        assert_eq!(stats.total_carbs, 107.0);
        assert_eq!(stats.total_fat, 28.0);
        assert_eq!(stats.total_fiber, 2.0);
    }

    #[test]
    fn test_stats_empty_is_zero() {
        assert_eq!(nutrition_stats(&[]), NutritionStats::default());
    }

    #[test]
    fn test_meal_distribution_fixed_order() {
        let rows = [("Dinner", 480), ("Breakfast", 350), ("Breakfast", 320), ("Brunch", 999)];
        assert_eq!(meal_distribution(rows), [670, 0, 480, 0]);
    }

    #[test]
    fn test_minerals_as_percent_of_daily_value() {
        let minerals = mineral_intake(&[food(0, 0.0, 0.0, 0.0)]);
        let expected = [50.0, 50.0, 0.0, 100.0, 10.0];
        for (got, want) in minerals.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn test_minerals_empty_is_zero() {
        assert_eq!(mineral_intake(&[]), [0.0; 5]);
    }

    #[test]
    fn test_macronutrient_shares() {
        let shares = macronutrient_distribution(&[food(0, 25.0, 50.0, 25.0)]);
        let expected = [25.0, 50.0, 25.0];
        for (got, want) in shares.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_macronutrient_zero_total() {
        assert_eq!(macronutrient_distribution(&[food(100, 0.0, 0.0, 0.0)]), [0.0; 3]);
    }
}
