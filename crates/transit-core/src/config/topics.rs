use crate::error::{Result, TransitError};
use crate::types::Category;
use serde::{Deserialize, Serialize};

/// Topic classification rules
///
/// Each field is a substring; a topic belongs to the first category whose
/// pattern it contains, checked in the order of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Default: "stations.table"
    #[serde(default = "default_station_metadata")]
    pub station_metadata: String,

    /// Default: "postgres-cta-stations"
    #[serde(default = "default_raw_station")]
    pub raw_station: String,

    /// Default: "arrival"
    #[serde(default = "default_arrival")]
    pub arrival: String,

    /// Default: "TURNSTILE_SUMMARY"
    #[serde(default = "default_turnstile_summary")]
    pub turnstile_summary: String,

    /// Default: "weather"
    #[serde(default = "default_weather")]
    pub weather: String,
}

fn default_station_metadata() -> String {
    "stations.table".to_string()
}

fn default_raw_station() -> String {
    "postgres-cta-stations".to_string()
}

fn default_arrival() -> String {
    "arrival".to_string()
}

fn default_turnstile_summary() -> String {
    "TURNSTILE_SUMMARY".to_string()
}

fn default_weather() -> String {
    "weather".to_string()
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            station_metadata: default_station_metadata(),
            raw_station: default_raw_station(),
            arrival: default_arrival(),
            turnstile_summary: default_turnstile_summary(),
            weather: default_weather(),
        }
    }
}

impl TopicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self, category: Category) -> &str {
        match category {
            Category::StationMetadata => &self.station_metadata,
            Category::RawStation => &self.raw_station,
            Category::Arrival => &self.arrival,
            Category::TurnstileSummary => &self.turnstile_summary,
            Category::Weather => &self.weather,
        }
    }

    pub fn with_pattern(mut self, category: Category, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        match category {
            Category::StationMetadata => self.station_metadata = pattern,
            Category::RawStation => self.raw_station = pattern,
            Category::Arrival => self.arrival = pattern,
            Category::TurnstileSummary => self.turnstile_summary = pattern,
            Category::Weather => self.weather = pattern,
        }
        self
    }

    /// Decide the category of a topic, or `None` if no pattern matches
    pub fn classify(&self, topic: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| topic.contains(self.pattern(*category)))
    }

    /// Reject empty patterns, which would match every topic.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            if self.pattern(category).is_empty() {
                return Err(TransitError::Config(format!(
                    "topic pattern for {} must not be empty",
                    category
                )));
            }
        }
        Ok(())
    }
}
