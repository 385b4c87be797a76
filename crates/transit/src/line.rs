//! A colored route and the stations it owns.
//!
//! A line learns its topology incrementally from station metadata that
//! arrives on its own stream, so any routed event may name a station the
//! line has not seen yet. That is an expected race, not a fault: the event
//! is logged and dropped.

use crate::station::Station;
use std::collections::HashMap;
use transit_core::{ArrivalEvent, LineColor, Result, StationId, StationMetadata, TransitError};

/// Result of offering station metadata to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New station stored
    Registered,
    /// Station id already present; the first registration stands
    AlreadyKnown,
    /// Metadata belongs to another line
    NotOwned,
}

/// What happened to the station a train departed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Cleared,
    UnknownStation,
    NotReported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalOutcome {
    pub departure: Departure,
    /// False when the arrival station is not registered and the event was lost
    pub arrived: bool,
}

#[derive(Debug, Clone)]
pub struct Line {
    color: LineColor,
    stations: HashMap<StationId, Station>,
}

impl Line {
    pub fn new(color: LineColor) -> Self {
        Self {
            color,
            stations: HashMap::new(),
        }
    }

    pub fn color(&self) -> LineColor {
        self.color
    }

    pub fn station(&self, station_id: StationId) -> Option<&Station> {
        self.stations.get(&station_id)
    }

    pub fn contains(&self, station_id: StationId) -> bool {
        self.stations.contains_key(&station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations sorted by position along the line (ties by id)
    pub fn stations_in_order(&self) -> Vec<&Station> {
        let mut stations: Vec<&Station> = self.stations.values().collect();
        stations.sort_by_key(|s| (s.order(), s.station_id()));
        stations
    }

    pub fn register_station_if_owned(&mut self, meta: &StationMetadata) -> Registration {
        if meta.line != self.color {
            return Registration::NotOwned;
        }
        if self.stations.contains_key(&meta.station_id) {
            tracing::debug!(
                "{} line already knows station {}, ignoring re-registration",
                self.color,
                meta.station_id
            );
            return Registration::AlreadyKnown;
        }
        self.stations
            .insert(meta.station_id, Station::from_metadata(meta));
        Registration::Registered
    }

    /// Apply an arrival: clear the previous stop, then occupy the new one.
    ///
    /// Missing stations are logged and skipped. The only error is an event
    /// for another line, which means the caller routed it wrongly.
    pub fn route_arrival(&mut self, event: &ArrivalEvent) -> Result<ArrivalOutcome> {
        if event.line != self.color {
            return Err(TransitError::InvalidState(format!(
                "arrival for {} line routed to {} line",
                event.line, self.color
            )));
        }

        let departure = match event.previous_stop() {
            Some((prev_id, prev_direction)) => match self.stations.get_mut(&prev_id) {
                Some(prev) => {
                    prev.apply_departure(prev_direction);
                    Departure::Cleared
                }
                None => {
                    tracing::debug!(
                        "{} line cannot clear departure from unknown station {}",
                        self.color,
                        prev_id
                    );
                    Departure::UnknownStation
                }
            },
            None => Departure::NotReported,
        };

        let arrived = match self.stations.get_mut(&event.station_id) {
            Some(station) => {
                station.apply_arrival(
                    event.direction,
                    event.train_id.clone(),
                    event.train_status.as_deref(),
                );
                true
            }
            None => {
                tracing::debug!(
                    "{} line dropping arrival of {} at unknown station {}",
                    self.color,
                    event.train_id,
                    event.station_id
                );
                false
            }
        };

        Ok(ArrivalOutcome { departure, arrived })
    }

    /// Returns false (after logging) when the station is not on this line.
    pub fn route_turnstile_summary(&mut self, station_id: StationId, count: u64) -> bool {
        match self.stations.get_mut(&station_id) {
            Some(station) => {
                station.apply_turnstile_count(count);
                true
            }
            None => {
                tracing::debug!(
                    "{} line dropping turnstile summary for unknown station {}",
                    self.color,
                    station_id
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_core::Direction;

    fn meta(id: StationId, name: &str, order: i32, line: LineColor) -> StationMetadata {
        StationMetadata {
            station_id: id,
            station_name: name.to_string(),
            order,
            line,
        }
    }

    fn arrival(station_id: StationId, prev: Option<(StationId, Direction)>) -> ArrivalEvent {
        ArrivalEvent {
            station_id,
            train_id: "T1".into(),
            direction: Direction::A,
            line: LineColor::Red,
            train_status: Some("in_service".into()),
            prev_station_id: prev.map(|(id, _)| id),
            prev_direction: prev.map(|(_, d)| d),
        }
    }

    fn red_line() -> Line {
        let mut line = Line::new(LineColor::Red);
        line.register_station_if_owned(&meta(1, "Red A", 1, LineColor::Red));
        line.register_station_if_owned(&meta(2, "Red B", 2, LineColor::Red));
        line
    }

    #[test]
    fn test_ignores_other_colors() {
        let mut line = Line::new(LineColor::Red);
        let result = line.register_station_if_owned(&meta(9, "Blue A", 1, LineColor::Blue));
        assert_eq!(result, Registration::NotOwned);
        assert!(line.is_empty());

        let result = line.register_station_if_owned(&meta(9, "Nowhere", 1, LineColor::None));
        assert_eq!(result, Registration::NotOwned);
        assert!(line.is_empty());
    }

    #[test]
    fn test_first_registration_wins() {
        let mut line = red_line();
        let mut before = line.station(1).cloned().unwrap();
        line.route_turnstile_summary(1, 5);
        before.apply_turnstile_count(5);

        let result = line.register_station_if_owned(&meta(1, "Renamed", 99, LineColor::Red));
        assert_eq!(result, Registration::AlreadyKnown);
        assert_eq!(line.station(1), Some(&before));
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn test_arrival_moves_train() {
        let mut line = red_line();
        line.route_arrival(&arrival(1, None)).unwrap();
        assert_eq!(
            line.station(1).unwrap().occupant(Direction::A).unwrap().train_id,
            "T1"
        );

        let outcome = line.route_arrival(&arrival(2, Some((1, Direction::A)))).unwrap();
        assert_eq!(outcome.departure, Departure::Cleared);
        assert!(outcome.arrived);
        assert!(line.station(1).unwrap().occupant(Direction::A).is_none());
        let occupant = line.station(2).unwrap().occupant(Direction::A).unwrap();
        assert_eq!(occupant.train_id, "T1");
        assert_eq!(occupant.status.as_deref(), Some("in service"));
    }

    #[test]
    fn test_unknown_previous_station_still_arrives() {
        let mut line = red_line();
        let outcome = line.route_arrival(&arrival(2, Some((77, Direction::B)))).unwrap();
        assert_eq!(outcome.departure, Departure::UnknownStation);
        assert!(outcome.arrived);
    }

    #[test]
    fn test_unknown_arrival_station_mutates_nothing() {
        let mut line = red_line();
        line.route_arrival(&arrival(1, None)).unwrap();
        let before: Vec<Station> = line.stations_in_order().into_iter().cloned().collect();

        let outcome = line.route_arrival(&arrival(404, None)).unwrap();
        assert!(!outcome.arrived);
        let after: Vec<Station> = line.stations_in_order().into_iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_wrong_line_is_programmer_error() {
        let mut line = Line::new(LineColor::Blue);
        let err = line.route_arrival(&arrival(1, None)).unwrap_err();
        assert!(matches!(err, TransitError::InvalidState(_)));
        assert!(!err.is_data_quality());
    }

    #[test]
    fn test_turnstile_routing() {
        let mut line = red_line();
        assert!(line.route_turnstile_summary(1, 42));
        assert!(!line.route_turnstile_summary(3, 42));
        assert_eq!(line.station(1).unwrap().turnstile_count(), 42);
    }

    #[test]
    fn test_stations_in_order() {
        let mut line = Line::new(LineColor::Green);
        line.register_station_if_owned(&meta(30, "C", 3, LineColor::Green));
        line.register_station_if_owned(&meta(10, "A", 1, LineColor::Green));
        line.register_station_if_owned(&meta(20, "B", 2, LineColor::Green));
        let names: Vec<&str> = line.stations_in_order().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
