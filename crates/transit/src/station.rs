//! Per-station state: occupancy per direction and turnstile count.

use serde::Serialize;
use std::fmt;
use transit_core::{Direction, StationId, StationMetadata};

/// Train currently recorded at a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub train_id: String,
    /// Display form of the train status; `None` when the arrival carried none
    pub status: Option<String>,
}

/// A single station on a line
///
/// Holds at most one occupant per direction. An occupant is cleared only by
/// a departure for that direction or replaced by a newer arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    station_id: StationId,
    name: String,
    order: i32,
    direction_a: Option<Occupant>,
    direction_b: Option<Occupant>,
    turnstile_count: u64,
}

impl Station {
    pub fn new(station_id: StationId, name: impl Into<String>, order: i32) -> Self {
        Self {
            station_id,
            name: name.into(),
            order,
            direction_a: None,
            direction_b: None,
            turnstile_count: 0,
        }
    }

    pub fn from_metadata(meta: &StationMetadata) -> Self {
        Self::new(meta.station_id, meta.station_name.clone(), meta.order)
    }

    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn occupant(&self, direction: Direction) -> Option<&Occupant> {
        match direction {
            Direction::A => self.direction_a.as_ref(),
            Direction::B => self.direction_b.as_ref(),
        }
    }

    pub fn turnstile_count(&self) -> u64 {
        self.turnstile_count
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Option<Occupant> {
        match direction {
            Direction::A => &mut self.direction_a,
            Direction::B => &mut self.direction_b,
        }
    }

    /// Record a train at the platform for `direction`.
    ///
    /// Last write wins: any previous occupant is replaced without comparing
    /// offsets or timestamps.
    pub fn apply_arrival(
        &mut self,
        direction: Direction,
        train_id: impl Into<String>,
        train_status: Option<&str>,
    ) {
        *self.slot_mut(direction) = Some(Occupant {
            train_id: train_id.into(),
            status: train_status.map(normalize_status),
        });
    }

    /// Clear the platform for `direction`. No-op when already empty.
    pub fn apply_departure(&mut self, direction: Direction) {
        *self.slot_mut(direction) = None;
    }

    /// Overwrite the turnstile count with an absolute snapshot.
    ///
    /// An older snapshot delivered late moves the count backward.
    pub fn apply_turnstile_count(&mut self, count: u64) {
        self.turnstile_count = count;
    }

    /// One-line human-readable view of the station
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Status codes use underscores as word separators; show them as spaces.
fn normalize_status(status: &str) -> String {
    status.replace('_', " ")
}

struct OccupantCell<'a>(Option<&'a Occupant>);

impl fmt::Display for OccupantCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = match self.0 {
            None => "---".to_string(),
            Some(Occupant {
                train_id,
                status: Some(status),
            }) => format!("{} ({})", train_id, status),
            Some(Occupant {
                train_id,
                status: None,
            }) => train_id.clone(),
        };
        f.pad(&cell)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Station | {:^5} | {:<30} | Direction A: | {:^20} | Direction B: | {:^20} | Entries: {:>6} |",
            self.station_id,
            self.name,
            OccupantCell(self.direction_a.as_ref()),
            OccupantCell(self.direction_b.as_ref()),
            self.turnstile_count,
        )
    }
}
