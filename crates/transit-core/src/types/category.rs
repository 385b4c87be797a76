use std::fmt;

/// Kind of inbound event, decided once from the topic at the dispatch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Transformed station table row (`station_id`, `station_name`, `order`, `line`)
    StationMetadata,
    /// Untransformed station row carrying per-color flags
    RawStation,
    /// Train arrival at a station
    Arrival,
    /// Absolute turnstile entry count for a station
    TurnstileSummary,
    /// Weather reading
    Weather,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::StationMetadata,
        Category::RawStation,
        Category::Arrival,
        Category::TurnstileSummary,
        Category::Weather,
    ];

    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StationMetadata => "station_metadata",
            Category::RawStation => "raw_station",
            Category::Arrival => "arrival",
            Category::TurnstileSummary => "turnstile_summary",
            Category::Weather => "weather",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
