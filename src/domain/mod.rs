//! Domain layer for rask-logger-control.
//!
//! Contains the canonical types shared across all modules:
//! - `Level`: Logger severity, with `Level::UNSET` as the "no explicit level" sentinel
//! - `LevelMap`: Sparse logger-name to level mapping and its diff algebra
//! - `ControlError`: Top-level error type

pub mod error;
pub mod level;
pub mod level_map;

pub use error::{ControlError, EntityCreationError, LevelMapError};
pub use level::Level;
pub use level_map::{LevelMap, ROOT_LOGGER};
