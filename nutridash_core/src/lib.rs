#![deny(
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
    clippy::missing_errors_doc
)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod catalogue;
pub mod extraction;
pub mod log;
pub mod nutrition;
pub mod state;

pub use catalogue::{Catalogue, CatalogueTotals, FoodEntry};
pub use extraction::{BuildError, ExtractionConfig, Extractor};
pub use log::{DeliveryReceiver, RecordLog};
pub use nutrition::{ChartData, DashboardUpdate, FoodItem, MealType, NutritionStats};
pub use state::{ConnectionState, StateReceiver, StateSender, connection_state_channel};

/// One chat message as it arrived from the remote stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

/// Timestamped result of running the extraction rules over one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub raw_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u64>,
}

impl ExtractedRecord {
    /// Whether either rule matched.
    #[must_use]
    pub const fn has_mention(&self) -> bool {
        self.food_item.is_some() || self.calories.is_some()
    }
}
