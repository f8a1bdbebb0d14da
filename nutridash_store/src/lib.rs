#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

mod aggregate;
mod convert;
mod error;
mod manager;

pub use aggregate::{
    DAILY_VALUES_MG, macronutrient_distribution, meal_distribution, mineral_intake,
    nutrition_stats,
};
pub use convert::NewFood;
pub use error::{Error, Result};
pub use manager::FoodStore;
