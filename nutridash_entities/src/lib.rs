pub mod food_items;
pub mod meal_logs;
