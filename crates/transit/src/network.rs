//! Owning context for all projection state
//!
//! One [`Network`] is built at startup and handed to the dispatcher; nothing
//! lives in globals. [`SharedNetwork`] wraps it for a single writer and any
//! number of concurrent readers.

use crate::line::{Line, Registration};
use crate::snapshot::{LineSnapshot, NetworkSnapshot};
use crate::weather::Weather;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use transit_core::{LineColor, NetworkConfig, StationId, StationMetadata};

#[derive(Debug, Clone)]
pub struct Network {
    lines: Vec<Line>,
    weather: Weather,
    /// Which line first registered each station id
    station_index: HashMap<StationId, LineColor>,
}

impl Network {
    pub fn new(config: &NetworkConfig) -> Self {
        Self::with_lines(config.lines.iter().copied())
    }

    pub fn with_lines(colors: impl IntoIterator<Item = LineColor>) -> Self {
        Self {
            lines: colors.into_iter().map(Line::new).collect(),
            weather: Weather::default(),
            station_index: HashMap::new(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, color: LineColor) -> Option<&Line> {
        self.lines.iter().find(|l| l.color() == color)
    }

    pub fn line_mut(&mut self, color: LineColor) -> Option<&mut Line> {
        self.lines.iter_mut().find(|l| l.color() == color)
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn weather_mut(&mut self) -> &mut Weather {
        &mut self.weather
    }

    /// Line that owns `station_id`, if any line has registered it
    pub fn line_for_station(&self, station_id: StationId) -> Option<LineColor> {
        self.station_index.get(&station_id).copied()
    }

    /// Offer metadata to every line; each decides ownership on its own.
    pub fn register_station(&mut self, meta: &StationMetadata) -> Registration {
        let mut result = Registration::NotOwned;

        for line in &mut self.lines {
            match line.register_station_if_owned(meta) {
                Registration::Registered => {
                    result = Registration::Registered;
                    match self.station_index.entry(meta.station_id) {
                        Entry::Vacant(slot) => {
                            slot.insert(line.color());
                        }
                        Entry::Occupied(existing) => {
                            tracing::warn!(
                                "Station {} registered on {} line but already indexed to {} line",
                                meta.station_id,
                                line.color(),
                                existing.get()
                            );
                        }
                    }
                }
                Registration::AlreadyKnown if result == Registration::NotOwned => {
                    result = Registration::AlreadyKnown;
                }
                _ => {}
            }
        }

        result
    }

    /// Route an absolute turnstile count to the owning line's station.
    ///
    /// Returns false when no line has registered the station.
    pub fn route_turnstile_summary(&mut self, station_id: StationId, count: u64) -> bool {
        let Some(color) = self.line_for_station(station_id) else {
            tracing::debug!(
                "Dropping turnstile summary for station {} owned by no line",
                station_id
            );
            return false;
        };
        self.line_mut(color)
            .is_some_and(|line| line.route_turnstile_summary(station_id, count))
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            lines: self
                .lines
                .iter()
                .map(|line| LineSnapshot {
                    color: line.color(),
                    color_code: line.color().color_code().to_string(),
                    stations: line.stations_in_order().into_iter().cloned().collect(),
                })
                .collect(),
            weather: self.weather.clone(),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(&NetworkConfig::default())
    }
}

/// Shared handle to a [`Network`]
///
/// Writers hold the write lock for the duration of one event; readers take
/// a consistent snapshot under the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedNetwork {
    inner: Arc<RwLock<Network>>,
}

impl SharedNetwork {
    pub fn new(network: Network) -> Self {
        Self {
            inner: Arc::new(RwLock::new(network)),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(Network::new(config))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Network> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Network> {
        self.inner.write()
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        self.inner.read().snapshot()
    }
}
