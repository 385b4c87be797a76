//! Current weather, independent of the line/station graph.

use serde::Serialize;
use transit_core::WeatherUpdate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    temperature: f64,
    status: String,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            temperature: 70.0,
            status: "sunny".to_string(),
        }
    }
}

impl Weather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Temperature in degrees Fahrenheit
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Merge a partial update; absent fields keep their current value.
    pub fn apply(&mut self, update: &WeatherUpdate) {
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(status) = &update.status {
            self.status = status.clone();
        }
        tracing::info!(
            "Weather updated: {} with temperature {}°F",
            self.status,
            self.temperature
        );
    }
}
