use serde::{Deserialize, Serialize};
use std::fmt;

/// Station identifier as carried on the wire
pub type StationId = i64;

/// Route color of a line
///
/// The wire form is the lowercase color name; the empty string (and any
/// color outside the fixed set) maps to [`LineColor::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineColor {
    Red,
    Blue,
    Green,
    None,
}

impl LineColor {
    /// The colors that own stations in the standard deployment.
    pub const ROUTED: [LineColor; 3] = [LineColor::Red, LineColor::Blue, LineColor::Green];

    pub fn from_wire(value: &str) -> Self {
        match value {
            "red" => LineColor::Red,
            "blue" => LineColor::Blue,
            "green" => LineColor::Green,
            _ => LineColor::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineColor::Red => "red",
            LineColor::Blue => "blue",
            LineColor::Green => "green",
            LineColor::None => "",
        }
    }

    /// Display color used by the board
    pub fn color_code(&self) -> &'static str {
        match self {
            LineColor::Red => "#DC143C",
            LineColor::Blue => "#1E90FF",
            LineColor::Green => "#32CD32",
            LineColor::None => "0xFFFFFF",
        }
    }
}

impl From<String> for LineColor {
    fn from(value: String) -> Self {
        LineColor::from_wire(&value)
    }
}

impl From<LineColor> for String {
    fn from(color: LineColor) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineColor::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Travel direction through a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    A,
    B,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::A => "a",
            Direction::B => "b",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
