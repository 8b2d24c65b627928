use thiserror::Error;

/// A level map (or one of its entries) violates the construction contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelMapError {
    #[error("Logger name must not be empty")]
    EmptyName,

    #[error("Invalid level '{input}'. Expected a non-negative integer or one of: {valid_levels:?}")]
    InvalidLevel {
        input: String,
        valid_levels: Vec<String>,
    },

    #[error("Invalid directive format '{input}'. Expected: '{expected}'")]
    InvalidDirectiveFormat { input: String, expected: String },
}

/// The live world refused to register a logger name.
///
/// Not retryable: the name has to be fixed or the entry dropped before the
/// map is applied again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot create logger '{name}': {reason}")]
pub struct EntityCreationError {
    pub name: String,
    pub reason: String,
}

impl EntityCreationError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for logger control.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Level map error: {0}")]
    LevelMap(#[from] LevelMapError),

    #[error(transparent)]
    EntityCreation(#[from] EntityCreationError),

    #[error("Codec error: {0}")]
    Codec(#[from] crate::codec::CodecError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
