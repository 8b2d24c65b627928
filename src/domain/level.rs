use super::error::LevelMapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Logger severity threshold.
///
/// Higher values are more severe. `Level::UNSET` is the sentinel for "no
/// explicit level": a logger at UNSET defers to its ancestors.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Level(u16);

const NAMED_LEVELS: &[(&str, Level)] = &[
    ("unset", Level::UNSET),
    ("trace", Level::TRACE),
    ("debug", Level::DEBUG),
    ("info", Level::INFO),
    ("warning", Level::WARNING),
    ("error", Level::ERROR),
    ("critical", Level::CRITICAL),
];

impl Level {
    pub const UNSET: Level = Level(0);
    pub const TRACE: Level = Level(5);
    pub const DEBUG: Level = Level(10);
    pub const INFO: Level = Level(20);
    pub const WARNING: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Canonical name for the well-known levels, `None` for custom values.
    pub fn as_str(self) -> Option<&'static str> {
        NAMED_LEVELS
            .iter()
            .find(|(_, level)| *level == self)
            .map(|(name, _)| *name)
    }

    /// Threshold as a `tracing` filter: the most verbose tracing level whose
    /// events still pass this threshold. `None` for UNSET, which inherits.
    ///
    /// tracing has nothing above ERROR, so CRITICAL clamps to ERROR; values
    /// above CRITICAL silence the target.
    pub fn to_level_filter(self) -> Option<LevelFilter> {
        match self.0 {
            0 => None,
            1..=5 => Some(LevelFilter::TRACE),
            6..=10 => Some(LevelFilter::DEBUG),
            11..=20 => Some(LevelFilter::INFO),
            21..=30 => Some(LevelFilter::WARN),
            31..=50 => Some(LevelFilter::ERROR),
            _ => Some(LevelFilter::OFF),
        }
    }
}

impl From<u16> for Level {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::TRACE,
            tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARNING,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

impl FromStr for Level {
    type Err = LevelMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Ok(value) = input.parse::<u16>() {
            return Ok(Level(value));
        }

        match input.to_lowercase().as_str() {
            "unset" | "notset" => Ok(Level::UNSET),
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARNING),
            "error" => Ok(Level::ERROR),
            "critical" | "fatal" => Ok(Level::CRITICAL),
            _ => Err(LevelMapError::InvalidLevel {
                input: s.to_string(),
                valid_levels: NAMED_LEVELS
                    .iter()
                    .map(|(name, _)| (*name).to_string())
                    .collect(),
            }),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}
