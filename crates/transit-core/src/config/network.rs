use crate::error::{Result, TransitError};
use crate::types::LineColor;
use serde::{Deserialize, Serialize};

/// Layout of the in-memory network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Lines instantiated at startup
    /// Default: red, blue, green
    #[serde(default = "default_lines")]
    pub lines: Vec<LineColor>,

    /// Maximum number of failed messages kept for inspection
    /// Default: 1000
    #[serde(default = "default_dead_letter_capacity")]
    pub dead_letter_capacity: usize,
}

fn default_lines() -> Vec<LineColor> {
    LineColor::ROUTED.to_vec()
}

fn default_dead_letter_capacity() -> usize {
    1000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            lines: default_lines(),
            dead_letter_capacity: default_dead_letter_capacity(),
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(mut self, lines: Vec<LineColor>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_dead_letter_capacity(mut self, capacity: usize) -> Self {
        self.dead_letter_capacity = capacity;
        self
    }

    /// One line per color.
    pub fn validate(&self) -> Result<()> {
        for (i, color) in self.lines.iter().enumerate() {
            if self.lines[..i].contains(color) {
                return Err(TransitError::Config(format!(
                    "line {} configured more than once",
                    color
                )));
            }
        }
        Ok(())
    }
}
