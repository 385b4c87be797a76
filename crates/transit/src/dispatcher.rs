//! Dispatcher
//!
//! Single entry point the event source calls into. Each message is
//! classified once from its topic, parsed as that category's payload, and
//! handed to the owning line (or the weather model). Nothing is carried
//! between calls; all state lives in the [`Network`](crate::Network).
//!
//! Data-quality problems never escape: malformed payloads, unknown stations
//! or lines, and unrecognized topics come back as
//! [`DispatchOutcome::Dropped`]. Only programmer errors are returned as `Err`.
//!
//! # Example
//!
//! ```
//! use transit::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let dispatcher = Dispatcher::new(SharedNetwork::default(), TopicConfig::default());
//!
//! let station = StationMetadata {
//!     station_id: 40010,
//!     station_name: "Austin".into(),
//!     order: 29,
//!     line: LineColor::Blue,
//! };
//! dispatcher.dispatch(&Message::json("org.chicago.cta.stations.table.v1", &station)?)?;
//!
//! let board = dispatcher.network().snapshot().board();
//! assert!(board.contains("Austin"));
//! # Ok(())
//! # }
//! ```

use crate::dead_letter::DeadLetterLog;
use crate::line::{Departure, Registration};
use crate::network::SharedNetwork;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use transit_core::{
    observe, ArrivalEvent, Category, Message, ProjectionConfig, Result, StationMetadata,
    StationRecord, TopicConfig, TransitError, TurnstileSummary, WeatherUpdate,
};

/// Why a message was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Payload did not parse as its category's schema
    MalformedPayload,
    /// Target station not registered (yet)
    UnknownStation,
    /// No configured line matches the event's color
    UnknownLine,
    /// Topic matched no category
    UnrecognizedCategory,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MalformedPayload => "malformed_payload",
            DropReason::UnknownStation => "unknown_station",
            DropReason::UnknownLine => "unknown_line",
            DropReason::UnrecognizedCategory => "unrecognized_category",
        }
    }
}

/// Result of dispatching one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State was updated
    Applied(Category),
    /// Well-formed but changed nothing (metadata for no configured line,
    /// or a station already registered)
    Ignored(Category),
    Dropped(DropReason),
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DispatchOutcome::Applied(_))
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, DispatchOutcome::Dropped(_))
    }
}

/// Running totals of dispatch outcomes
#[derive(Debug, Default)]
pub struct DispatchStats {
    applied: AtomicU64,
    ignored: AtomicU64,
    malformed: AtomicU64,
    unknown_station: AtomicU64,
    unknown_line: AtomicU64,
    unrecognized: AtomicU64,
}

impl DispatchStats {
    fn record(&self, outcome: &DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Applied(_) => &self.applied,
            DispatchOutcome::Ignored(_) => &self.ignored,
            DispatchOutcome::Dropped(DropReason::MalformedPayload) => &self.malformed,
            DispatchOutcome::Dropped(DropReason::UnknownStation) => &self.unknown_station,
            DispatchOutcome::Dropped(DropReason::UnknownLine) => &self.unknown_line,
            DispatchOutcome::Dropped(DropReason::UnrecognizedCategory) => &self.unrecognized,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            applied: self.applied.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            unknown_station: self.unknown_station.load(Ordering::Relaxed),
            unknown_line: self.unknown_line.load(Ordering::Relaxed),
            unrecognized: self.unrecognized.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    pub applied: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub unknown_station: u64,
    pub unknown_line: u64,
    pub unrecognized: u64,
}

impl DispatchStatsSnapshot {
    pub fn dropped(&self) -> u64 {
        self.malformed + self.unknown_station + self.unknown_line + self.unrecognized
    }

    pub fn total(&self) -> u64 {
        self.applied + self.ignored + self.dropped()
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    network: SharedNetwork,
    topics: TopicConfig,
    stats: Arc<DispatchStats>,
    dead_letters: Arc<DeadLetterLog>,
}

impl Dispatcher {
    pub fn new(network: SharedNetwork, topics: TopicConfig) -> Self {
        Self {
            network,
            topics,
            stats: Arc::new(DispatchStats::default()),
            dead_letters: Arc::new(DeadLetterLog::default()),
        }
    }

    /// Build a fresh network and dispatcher from validated configuration
    pub fn from_config(config: &ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            SharedNetwork::from_config(&config.network),
            config.topics.clone(),
        )
        .with_dead_letter_log(DeadLetterLog::new(config.network.dead_letter_capacity)))
    }

    pub fn with_dead_letter_log(mut self, log: DeadLetterLog) -> Self {
        self.dead_letters = Arc::new(log);
        self
    }

    pub fn network(&self) -> &SharedNetwork {
        &self.network
    }

    pub fn topics(&self) -> &TopicConfig {
        &self.topics
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn dead_letters(&self) -> &DeadLetterLog {
        &self.dead_letters
    }

    pub fn classify(&self, topic: &str) -> Option<Category> {
        self.topics.classify(topic)
    }

    /// Apply one message to the projection.
    pub fn dispatch(&self, message: &Message) -> Result<DispatchOutcome> {
        let result = match self.classify(&message.topic) {
            Some(category) => self.dispatch_category(category, message),
            None => Err(TransitError::UnrecognizedCategory(message.topic.clone())),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_data_quality() => {
                let reason = match &e {
                    TransitError::UnrecognizedCategory(_) => {
                        tracing::debug!("No handler for message from topic {}", message.topic);
                        DropReason::UnrecognizedCategory
                    }
                    _ => {
                        tracing::warn!(
                            "Dropping message {}[{}]@{}: {}",
                            message.topic,
                            message.partition,
                            message.offset,
                            e
                        );
                        DropReason::MalformedPayload
                    }
                };
                self.dead_letters.add(message, reason, &e);
                DispatchOutcome::Dropped(reason)
            }
            Err(e) => {
                tracing::error!(
                    "Bug while dispatching {}[{}]@{}: {}",
                    message.topic,
                    message.partition,
                    message.offset,
                    e
                );
                observe::record_programmer_error();
                return Err(e);
            }
        };

        self.stats.record(&outcome);
        match outcome {
            DispatchOutcome::Applied(category) => observe::record_applied(category.as_str()),
            DispatchOutcome::Dropped(reason) => observe::record_dropped(reason.as_str()),
            DispatchOutcome::Ignored(_) => {}
        }
        Ok(outcome)
    }

    fn dispatch_category(&self, category: Category, message: &Message) -> Result<DispatchOutcome> {
        match category {
            Category::StationMetadata => {
                let meta: StationMetadata = message.decode(category)?;
                Ok(self.register(category, &meta))
            }
            Category::RawStation => {
                let record: StationRecord = message.decode(category)?;
                Ok(self.register(category, &record.into_metadata()))
            }
            Category::Arrival => {
                let event: ArrivalEvent = message.decode(category)?;
                self.route_arrival(&event)
            }
            Category::TurnstileSummary => {
                let summary: TurnstileSummary = message.decode(category)?;
                let applied = self
                    .network
                    .write()
                    .route_turnstile_summary(summary.station_id, summary.count);
                Ok(if applied {
                    DispatchOutcome::Applied(category)
                } else {
                    DispatchOutcome::Dropped(DropReason::UnknownStation)
                })
            }
            Category::Weather => {
                let update: WeatherUpdate = message.decode(category)?;
                self.network.write().weather_mut().apply(&update);
                Ok(DispatchOutcome::Applied(category))
            }
        }
    }

    fn register(&self, category: Category, meta: &StationMetadata) -> DispatchOutcome {
        match self.network.write().register_station(meta) {
            Registration::Registered => DispatchOutcome::Applied(category),
            Registration::AlreadyKnown | Registration::NotOwned => {
                DispatchOutcome::Ignored(category)
            }
        }
    }

    fn route_arrival(&self, event: &ArrivalEvent) -> Result<DispatchOutcome> {
        let mut network = self.network.write();
        let Some(line) = network.line_mut(event.line) else {
            tracing::debug!(
                "Dropping arrival of {} for unknown line '{}'",
                event.train_id,
                event.line.as_str()
            );
            return Ok(DispatchOutcome::Dropped(DropReason::UnknownLine));
        };

        let outcome = line.route_arrival(event)?;
        // Clearing the previous platform is a state change even when the
        // arrival itself is lost.
        Ok(
            if outcome.arrived || outcome.departure == Departure::Cleared {
                DispatchOutcome::Applied(Category::Arrival)
            } else {
                DispatchOutcome::Dropped(DropReason::UnknownStation)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use transit_core::{Direction, LineColor};

    const STATIONS: &str = "org.chicago.cta.stations.table.v1";
    const ARRIVALS: &str = "org.chicago.cta.station.arrivals.v1";

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(SharedNetwork::default(), TopicConfig::default())
    }

    fn send(d: &Dispatcher, topic: &str, value: serde_json::Value) -> DispatchOutcome {
        let message = Message::new(topic, value.to_string());
        d.dispatch(&message).unwrap()
    }

    fn register(d: &Dispatcher, id: i64, name: &str, order: i32, line: &str) -> DispatchOutcome {
        send(
            d,
            STATIONS,
            json!({"station_id": id, "station_name": name, "order": order, "line": line}),
        )
    }

    #[test]
    fn test_station_metadata_goes_to_every_line() {
        let d = dispatcher();
        assert_eq!(
            register(&d, 1, "Red A", 1, "red"),
            DispatchOutcome::Applied(Category::StationMetadata)
        );
        assert_eq!(
            register(&d, 2, "Blue A", 1, "blue"),
            DispatchOutcome::Applied(Category::StationMetadata)
        );
        assert_eq!(
            register(&d, 3, "Orphan", 1, ""),
            DispatchOutcome::Ignored(Category::StationMetadata)
        );

        let snapshot = d.network().snapshot();
        assert_eq!(snapshot.line(LineColor::Red).unwrap().stations.len(), 1);
        assert_eq!(snapshot.line(LineColor::Blue).unwrap().stations.len(), 1);
        assert_eq!(snapshot.station_count(), 2);
    }

    #[test]
    fn test_raw_station_record() {
        let d = dispatcher();
        let outcome = send(
            &d,
            "postgres-cta-stations",
            json!({
                "stop_id": 30001, "direction_id": "E", "stop_name": "Austin (O'Hare-bound)",
                "station_name": "Austin", "station_descriptive_name": "Austin (Blue Line)",
                "station_id": 40010, "order": 29, "red": false, "blue": true, "green": false
            }),
        );
        assert_eq!(outcome, DispatchOutcome::Applied(Category::RawStation));
        let network = d.network().read();
        assert!(network.line(LineColor::Blue).unwrap().contains(40010));
    }

    #[test]
    fn test_arrival_unknown_line_dropped() {
        let d = dispatcher();
        register(&d, 1, "Red A", 1, "red");
        let outcome = send(
            &d,
            ARRIVALS,
            json!({"station_id": 1, "train_id": "P1", "direction": "a", "line": "purple"}),
        );
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::UnknownLine));
        assert!(d
            .network()
            .snapshot()
            .station(1)
            .unwrap()
            .occupant(Direction::A)
            .is_none());
    }

    #[test]
    fn test_arrival_unknown_station_dropped() {
        let d = dispatcher();
        let outcome = send(
            &d,
            ARRIVALS,
            json!({"station_id": 9, "train_id": "R1", "direction": "b", "line": "red"}),
        );
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::UnknownStation));
        // Unknown targets are benign races, not dead letters.
        assert!(d.dead_letters().is_empty());
    }

    #[test]
    fn test_malformed_payload_dropped_and_recorded() {
        let d = dispatcher();
        let message = Message::new(ARRIVALS, "{\"station_id\": 1").with_position(1, 99);
        let outcome = d.dispatch(&message).unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::MalformedPayload));

        let bad_direction = send(
            &d,
            ARRIVALS,
            json!({"station_id": 1, "train_id": "R1", "direction": "up", "line": "red"}),
        );
        assert_eq!(
            bad_direction,
            DispatchOutcome::Dropped(DropReason::MalformedPayload)
        );

        let entries = d.dead_letters().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].partition, 1);
        assert_eq!(entries[0].offset, 99);
        assert_eq!(entries[0].reason, DropReason::MalformedPayload);
    }

    #[test]
    fn test_unrecognized_topic() {
        let d = dispatcher();
        let outcome = send(&d, "org.chicago.cta.station.turnstile.v1", json!({}));
        assert_eq!(
            outcome,
            DispatchOutcome::Dropped(DropReason::UnrecognizedCategory)
        );
        assert_eq!(
            d.dead_letters().entries()[0].reason,
            DropReason::UnrecognizedCategory
        );
    }

    #[test]
    fn test_turnstile_summary_routing() {
        let d = dispatcher();
        register(&d, 1, "Green A", 1, "green");
        assert_eq!(
            send(&d, "TURNSTILE_SUMMARY", json!({"STATION_ID": 1, "COUNT": 42})),
            DispatchOutcome::Applied(Category::TurnstileSummary)
        );
        assert_eq!(
            send(&d, "TURNSTILE_SUMMARY", json!({"STATION_ID": 2, "COUNT": 42})),
            DispatchOutcome::Dropped(DropReason::UnknownStation)
        );
        assert_eq!(
            d.network().snapshot().station(1).unwrap().turnstile_count(),
            42
        );
    }

    #[test]
    fn test_weather_routing() {
        let d = dispatcher();
        assert_eq!(
            send(&d, "org.chicago.cta.weather.v1", json!({"temperature": 12.5})),
            DispatchOutcome::Applied(Category::Weather)
        );
        assert_eq!(
            send(&d, "org.chicago.cta.weather.v1", json!("snow")),
            DispatchOutcome::Dropped(DropReason::MalformedPayload)
        );
        let snapshot = d.network().snapshot();
        assert_eq!(snapshot.weather.temperature(), 12.5);
        assert_eq!(snapshot.weather.status(), "sunny");
    }

    #[test]
    fn test_malformed_weather_leaves_state() {
        let d = dispatcher();
        const WEATHER: &str = "org.chicago.cta.weather.v1";
        send(&d, WEATHER, json!({"temperature": 55.0, "status": "cloudy"}));
        let before = d.network().snapshot().weather;

        for raw in ["{not json", "[1, 2]", r#"{"temperature": "warm"}"#] {
            let outcome = d.dispatch(&Message::new(WEATHER, raw)).unwrap();
            assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::MalformedPayload));
        }
        assert_eq!(d.network().snapshot().weather, before);
        assert_eq!(d.stats().malformed, 3);
        assert_eq!(d.dead_letters().len(), 3);
    }

    #[test]
    fn test_stats_track_outcomes() {
        let d = dispatcher();
        register(&d, 1, "Red A", 1, "red");
        register(&d, 1, "Red A", 1, "red");
        send(&d, "nowhere", json!({}));
        send(&d, "TURNSTILE_SUMMARY", json!({"STATION_ID": 5}));

        let stats = d.stats();
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.unrecognized, 1);
        assert_eq!(stats.unknown_station, 1);
        assert_eq!(stats.dropped(), 2);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_from_config_validates() {
        let bad = ProjectionConfig::new()
            .with_topics(TopicConfig::new().with_pattern(Category::Arrival, ""));
        assert!(Dispatcher::from_config(&bad).is_err());

        let config = ProjectionConfig::new().with_network(
            transit_core::NetworkConfig::new()
                .with_lines(vec![LineColor::Red])
                .with_dead_letter_capacity(3),
        );
        let d = Dispatcher::from_config(&config).unwrap();
        assert_eq!(d.dead_letters().capacity(), 3);
        assert_eq!(d.network().read().lines().len(), 1);
    }
}
