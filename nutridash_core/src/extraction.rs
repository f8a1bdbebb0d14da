//! Heuristic food and calorie extraction from chat text.
//!
//! Two independent regex rules run over every message: one picks up the
//! phrase after "holding"/"have", the other picks up the first integer
//! followed by "calorie(s)". Either, both or neither may match; every
//! message still yields exactly one [`ExtractedRecord`].

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{ExtractedRecord, InboundMessage};

/// Default food-mention rule. The phrase ends at " in", a period, a comma
/// or the end of the text, optionally after one trailing newline.
pub const DEFAULT_FOOD_PATTERN: &str = r"(?:holding|have) (?:a |an )?(.*?)(?: in|\.|,|\n?$)";

/// Default calorie rule. A range such as `350-400` keeps the first number.
pub const DEFAULT_CALORIE_PATTERN: &str = r"(?i)([0-9]+)(?:\s*-\s*[0-9]+)?\s*calories?";

/// Error type for pattern building.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid {rule} pattern: {reason}")]
    Regex { rule: &'static str, reason: String },

    #[error("{0} pattern must contain a capture group")]
    MissingCapture(&'static str),
}

/// Pattern configuration, loadable from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Regex whose first capture group is the food phrase.
    #[serde(default = "ExtractionConfig::default_food_pattern")]
    pub food_pattern: String,

    /// Regex whose first capture group is the calorie count.
    #[serde(default = "ExtractionConfig::default_calorie_pattern")]
    pub calorie_pattern: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            food_pattern: Self::default_food_pattern(),
            calorie_pattern: Self::default_calorie_pattern(),
        }
    }
}

impl ExtractionConfig {
    fn default_food_pattern() -> String {
        DEFAULT_FOOD_PATTERN.to_string()
    }

    fn default_calorie_pattern() -> String {
        DEFAULT_CALORIE_PATTERN.to_string()
    }
}

fn compile(rule: &'static str, pattern: &str) -> Result<Regex, BuildError> {
    let re = Regex::new(pattern).map_err(|e| BuildError::Regex {
        rule,
        reason: e.to_string(),
    })?;
    if re.captures_len() < 2 {
        return Err(BuildError::MissingCapture(rule));
    }
    Ok(re)
}

/// Compiled extraction rules.
#[derive(Debug, Clone)]
pub struct Extractor {
    food: Regex,
    calories: Regex,
}

impl Extractor {
    /// Compile the rules from configuration.
    ///
    /// # Errors
    /// Returns an error if a pattern does not compile or has no capture group.
    pub fn new(config: &ExtractionConfig) -> Result<Self, BuildError> {
        Ok(Self {
            food: compile("food", &config.food_pattern)?,
            calories: compile("calorie", &config.calorie_pattern)?,
        })
    }

    /// Create an extractor with the default rules.
    ///
    /// # Errors
    /// Returns an error if the default patterns fail to compile.
    pub fn with_defaults() -> Result<Self, BuildError> {
        Self::new(&ExtractionConfig::default())
    }

    /// First food phrase mentioned in `text`, if any.
    #[must_use]
    pub fn food_item(&self, text: &str) -> Option<String> {
        let caps = self.food.captures(text)?;
        let phrase = caps.get(1)?.as_str().trim();
        (!phrase.is_empty()).then(|| phrase.to_string())
    }

    /// First calorie count mentioned in `text`, if any.
    #[must_use]
    pub fn calories(&self, text: &str) -> Option<u64> {
        let caps = self.calories.captures(text)?;
        let digits = caps.get(1)?.as_str();
        match digits.parse::<u64>() {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring calorie value {digits:?}: {e}");
                None
            }
        }
    }

    /// Run both rules over a message and build its record.
    #[must_use]
    pub fn extract(&self, message: &InboundMessage) -> ExtractedRecord {
        ExtractedRecord {
            id: Uuid::now_v7(),
            timestamp: message.received_at,
            raw_message: message.text.clone(),
            food_item: self.food_item(&message.text),
            calories: self.calories(&message.text),
        }
    }

    /// Convenience for text that has not been wrapped in an [`InboundMessage`].
    #[must_use]
    pub fn extract_text(&self, text: &str) -> ExtractedRecord {
        self.extract(&InboundMessage {
            text: text.to_string(),
            received_at: Utc::now(),
        })
    }
}
