//! Detached, read-only copies of projection state for the display layer.

use crate::station::Station;
use crate::weather::Weather;
use serde::Serialize;
use std::fmt::Write;
use transit_core::{LineColor, StationId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSnapshot {
    pub color: LineColor,
    pub color_code: String,
    /// Ordered by position along the line
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSnapshot {
    pub lines: Vec<LineSnapshot>,
    pub weather: Weather,
}

impl NetworkSnapshot {
    pub fn line(&self, color: LineColor) -> Option<&LineSnapshot> {
        self.lines.iter().find(|l| l.color == color)
    }

    /// First station with this id, searching lines in configuration order
    pub fn station(&self, station_id: StationId) -> Option<&Station> {
        self.lines
            .iter()
            .flat_map(|l| l.stations.iter())
            .find(|s| s.station_id() == station_id)
    }

    pub fn station_count(&self) -> usize {
        self.lines.iter().map(|l| l.stations.len()).sum()
    }

    /// Text board: weather, then each line's stations in order
    pub fn board(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Weather: {} {:.1}°F",
            self.weather.status(),
            self.weather.temperature()
        );
        for line in &self.lines {
            let _ = writeln!(
                out,
                "\n{} line ({}) - {} stations",
                line.color,
                line.color_code,
                line.stations.len()
            );
            for station in &line.stations {
                let _ = writeln!(out, "{}", station.describe());
            }
        }
        out
    }
}
