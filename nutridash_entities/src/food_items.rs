use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Nutrition facts of one stored food. List columns hold JSON arrays.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
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
    #[sea_orm(column_type = "Text")]
    pub benefits: String,
    #[sea_orm(column_type = "Text")]
    pub drawbacks: String,
    #[sea_orm(column_type = "Text")]
    pub alternatives: String,
    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meal_logs::Entity")]
    MealLogs,
}

impl Related<super::meal_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
