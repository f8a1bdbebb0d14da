use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Stored list column is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Food item {0} does not exist")]
    FoodNotFound(i32),

    #[error("Calorie value {calories} for {name} does not fit the store")]
    CaloriesOutOfRange { name: String, calories: u32 },
}
