//! Live-world logger registries.
//!
//! A registry is the externally owned set of named loggers that a
//! [`LevelMap`](crate::LevelMap) is reconciled against. It is discovered at
//! runtime and grows as new names get their first level assignment.

pub mod filter;
pub mod memory;
pub mod shared;

pub use filter::{TracingFilterRegistry, validate_logger_name};
pub use memory::InMemoryRegistry;
pub use shared::SharedRegistry;

use crate::domain::{EntityCreationError, Level};

/// The capability surface reconciliation needs from a live world.
///
/// `root` always exists conceptually, whether or not `logger_names` lists it.
pub trait LoggerRegistry {
    /// Every logger currently registered.
    fn logger_names(&self) -> Vec<String>;

    /// Current level of `name`, `Level::UNSET` when it has none or does not exist.
    fn level(&self, name: &str) -> Level;

    /// Assign a level, registering `name` first if it is not known yet.
    fn set_level(&mut self, name: &str, level: Level) -> Result<(), EntityCreationError>;
}
