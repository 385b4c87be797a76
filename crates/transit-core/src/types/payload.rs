//! Inbound payload schemas, one per category.

use super::network::{Direction, LineColor, StationId};
use serde::{Deserialize, Serialize};

/// A station's static description, as published on the stations table topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationMetadata {
    pub station_id: StationId,
    pub station_name: String,
    pub order: i32,
    pub line: LineColor,
}

/// Untransformed station row as ingested from the station database
///
/// One row exists per stop; the color flags say which line serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub stop_id: i64,
    pub direction_id: String,
    pub stop_name: String,
    pub station_name: String,
    pub station_descriptive_name: String,
    pub station_id: StationId,
    pub order: i32,
    pub red: bool,
    pub blue: bool,
    pub green: bool,
}

impl StationRecord {
    /// Collapse the color flags into a single line color.
    ///
    /// Red takes precedence over blue, blue over green; a row with no flag
    /// set belongs to no line.
    pub fn line(&self) -> LineColor {
        if self.red {
            LineColor::Red
        } else if self.blue {
            LineColor::Blue
        } else if self.green {
            LineColor::Green
        } else {
            LineColor::None
        }
    }

    pub fn into_metadata(self) -> StationMetadata {
        let line = self.line();
        StationMetadata {
            station_id: self.station_id,
            station_name: self.station_name,
            order: self.order,
            line,
        }
    }
}

/// A train arriving at a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalEvent {
    pub station_id: StationId,
    pub train_id: String,
    pub direction: Direction,
    pub line: LineColor,
    #[serde(default)]
    pub train_status: Option<String>,
    #[serde(default)]
    pub prev_station_id: Option<StationId>,
    #[serde(default)]
    pub prev_direction: Option<Direction>,
}

impl ArrivalEvent {
    /// Where the train departed from, when both halves are known
    pub fn previous_stop(&self) -> Option<(StationId, Direction)> {
        match (self.prev_station_id, self.prev_direction) {
            (Some(id), Some(direction)) => Some((id, direction)),
            _ => None,
        }
    }
}

/// Absolute turnstile entry count for one station
///
/// Field names are upper case on the wire. A missing count reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnstileSummary {
    #[serde(rename = "STATION_ID")]
    pub station_id: StationId,
    #[serde(rename = "COUNT", default)]
    pub count: u64,
}

/// Partial weather reading; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(red: bool, blue: bool, green: bool) -> StationRecord {
        StationRecord {
            stop_id: 30001,
            direction_id: "E".into(),
            stop_name: "Austin (O'Hare-bound)".into(),
            station_name: "Austin".into(),
            station_descriptive_name: "Austin (Blue Line)".into(),
            station_id: 40010,
            order: 29,
            red,
            blue,
            green,
        }
    }

    #[test]
    fn test_record_color_precedence() {
        assert_eq!(record(true, true, true).line(), LineColor::Red);
        assert_eq!(record(false, true, true).line(), LineColor::Blue);
        assert_eq!(record(false, false, true).line(), LineColor::Green);
        assert_eq!(record(false, false, false).line(), LineColor::None);
    }

    #[test]
    fn test_record_into_metadata() {
        let meta = record(false, true, false).into_metadata();
        assert_eq!(
            meta,
            StationMetadata {
                station_id: 40010,
                station_name: "Austin".into(),
                order: 29,
                line: LineColor::Blue,
            }
        );
    }

    #[test]
    fn test_arrival_optional_fields() {
        let event: ArrivalEvent = serde_json::from_str(
            r#"{"station_id": 2, "train_id": "T1", "direction": "a", "line": "red",
                "train_status": "in_service", "prev_station_id": null, "prev_direction": null}"#,
        )
        .unwrap();
        assert_eq!(event.previous_stop(), None);
        assert_eq!(event.train_status.as_deref(), Some("in_service"));

        let event: ArrivalEvent = serde_json::from_str(
            r#"{"station_id": 2, "train_id": "T1", "direction": "b", "line": "red",
                "prev_station_id": 1}"#,
        )
        .unwrap();
        assert_eq!(event.train_status, None);
        // Half a previous stop is no previous stop.
        assert_eq!(event.previous_stop(), None);
    }

    #[test]
    fn test_turnstile_summary_field_names() {
        let summary: TurnstileSummary =
            serde_json::from_str(r#"{"STATION_ID": 40010, "COUNT": 42}"#).unwrap();
        assert_eq!(summary.station_id, 40010);
        assert_eq!(summary.count, 42);

        let summary: TurnstileSummary = serde_json::from_str(r#"{"STATION_ID": 40010}"#).unwrap();
        assert_eq!(summary.count, 0);

        assert!(serde_json::from_str::<TurnstileSummary>(r#"{"station_id": 1}"#).is_err());
    }
}
