use chrono::Utc;
use nutridash_core::{Catalogue, ChartData, DashboardUpdate, FoodItem, MealType, NutritionStats};
use nutridash_entities::{food_items, meal_logs};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryOrder, Schema, Set,
};
use tracing::{debug, info};

use crate::convert::{NewFood, food_item_from_model};
use crate::{Error, Result, aggregate};

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("table") && err.to_string().contains("already exists")
}

/// Relational store behind the persisted dashboard endpoints.
#[derive(Debug, Clone)]
pub struct FoodStore {
    db: DatabaseConnection,
}

impl FoodStore {
    /// Connect and create the `food_items` and `meal_logs` tables if missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to database: {}", database_url);
        let db = Database::connect(database_url).await?;

        let store = Self { db };
        store.create_table(food_items::Entity).await?;
        store.create_table(meal_logs::Entity).await?;

        info!("FoodStore initialized");
        Ok(store)
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> Result<()> {
        let table = entity.table_name().to_owned();
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let stmt = schema.create_table_from_entity(entity);
        match self
            .db
            .execute_unprepared(&backend.build(&stmt).to_string())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_table_already_exists_error(&e) => {
                debug!("Table {table} already exists, skipping creation");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Store a food item and return its id.
    pub async fn insert_food(&self, food: NewFood) -> Result<i32> {
        let model = food.into_active_model()?.insert(&self.db).await?;
        info!("Stored food item {} ({})", model.id, model.name);
        Ok(model.id)
    }

    /// Record that a stored food was eaten at `meal`.
    pub async fn log_meal(&self, food_id: i32, meal: MealType) -> Result<i32> {
        if food_items::Entity::find_by_id(food_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(Error::FoodNotFound(food_id));
        }

        let model = meal_logs::ActiveModel {
            food_id: Set(food_id),
            meal_type: Set(meal.to_string()),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!("Logged food {food_id} for {meal}");
        Ok(model.id)
    }

    /// Load the catalogue with one meal log per entry. Does nothing when
    /// food items already exist; returns the number of items inserted.
    pub async fn seed_from_catalogue(&self, catalogue: &Catalogue) -> Result<usize> {
        let existing = food_items::Entity::find().count(&self.db).await?;
        if existing > 0 {
            info!("Store already holds {existing} food items, skipping seed");
            return Ok(0);
        }

        for entry in catalogue.entries() {
            let id = self.insert_food(NewFood::try_from(entry)?).await?;
            self.log_meal(id, entry.meal_type).await?;
        }

        info!("Seeded {} food items from catalogue", catalogue.len());
        Ok(catalogue.len())
    }

    /// All food items, newest first.
    pub async fn list_foods(&self) -> Result<Vec<FoodItem>> {
        food_items::Entity::find()
            .order_by_desc(food_items::Column::Timestamp)
            .all(&self.db)
            .await?
            .into_iter()
            .map(food_item_from_model)
            .collect()
    }

    pub async fn nutrition_stats(&self) -> Result<NutritionStats> {
        let foods = self.all_models().await?;
        Ok(aggregate::nutrition_stats(&foods))
    }

    /// Calories per meal type: Breakfast, Lunch, Dinner, Snacks.
    pub async fn meal_distribution(&self) -> Result<[i64; 4]> {
        let rows = meal_logs::Entity::find()
            .find_also_related(food_items::Entity)
            .all(&self.db)
            .await?;

        Ok(aggregate::meal_distribution(rows.iter().filter_map(
            |(log, food)| food.as_ref().map(|f| (log.meal_type.as_str(), f.calories)),
        )))
    }

    pub async fn mineral_intake(&self) -> Result<[f64; 5]> {
        let foods = self.all_models().await?;
        Ok(aggregate::mineral_intake(&foods))
    }

    pub async fn macronutrient_distribution(&self) -> Result<[f64; 3]> {
        let foods = self.all_models().await?;
        Ok(aggregate::macronutrient_distribution(&foods))
    }

    pub async fn chart_data(&self) -> Result<ChartData> {
        let foods = self.all_models().await?;
        Ok(ChartData {
            macronutrients: aggregate::macronutrient_distribution(&foods),
            meal_calories: self.meal_distribution().await?,
            minerals: aggregate::mineral_intake(&foods),
        })
    }

    /// Everything a dashboard client needs after a refresh request.
    pub async fn dashboard_update(&self) -> Result<DashboardUpdate> {
        Ok(DashboardUpdate {
            stats: self.nutrition_stats().await?,
            foods: self.list_foods().await?,
            charts: self.chart_data().await?,
        })
    }

    async fn all_models(&self) -> Result<Vec<food_items::Model>> {
        Ok(food_items::Entity::find().all(&self.db).await?)
    }
}
