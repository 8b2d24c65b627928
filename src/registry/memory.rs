use super::LoggerRegistry;
use crate::domain::{EntityCreationError, Level, ROOT_LOGGER};
use std::collections::BTreeMap;
use tracing::debug;

/// Plain in-process logger registry.
///
/// Open registries create loggers on first assignment; sealed ones only
/// accept levels for loggers they already hold (and `root`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryRegistry {
    loggers: BTreeMap<String, Level>,
    sealed: bool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the given loggers.
    pub fn with_loggers<I, K>(loggers: I) -> Self
    where
        I: IntoIterator<Item = (K, Level)>,
        K: Into<String>,
    {
        Self {
            loggers: loggers
                .into_iter()
                .map(|(name, level)| (name.into(), level))
                .filter(|(name, _)| !name.is_empty())
                .collect(),
            sealed: false,
        }
    }

    /// Stop accepting new logger names.
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Level> {
        self.loggers.remove(name)
    }
}

impl LoggerRegistry for InMemoryRegistry {
    fn logger_names(&self) -> Vec<String> {
        self.loggers.keys().cloned().collect()
    }

    fn level(&self, name: &str) -> Level {
        self.loggers.get(name).copied().unwrap_or(Level::UNSET)
    }

    fn set_level(&mut self, name: &str, level: Level) -> Result<(), EntityCreationError> {
        if let Some(current) = self.loggers.get_mut(name) {
            *current = level;
            return Ok(());
        }

        if name.is_empty() {
            return Err(EntityCreationError::new(name, "logger name is empty"));
        }
        if self.sealed && name != ROOT_LOGGER {
            return Err(EntityCreationError::new(
                name,
                "registry is sealed and does not accept new loggers",
            ));
        }

        debug!(logger = name, %level, "Registering logger");
        self.loggers.insert(name.to_string(), level);
        Ok(())
    }
}
