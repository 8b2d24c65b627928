use super::{InMemoryRegistry, LoggerRegistry};
use crate::domain::{EntityCreationError, Level, LevelMap};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Dotted identifiers; each segment must also be valid in a tracing target.
const LOGGER_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_\-]*(\.[A-Za-z_][A-Za-z0-9_\-]*)*$";

static LOGGER_NAME: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Check that `name` can be rendered as an `EnvFilter` target.
pub fn validate_logger_name(name: &str) -> Result<(), EntityCreationError> {
    match LOGGER_NAME.get_or_init(|| Regex::new(LOGGER_NAME_PATTERN)) {
        Ok(regex) if regex.is_match(name) => Ok(()),
        Ok(_) => Err(EntityCreationError::new(
            name,
            "expected dot-separated identifiers (letters, digits, '_' or '-')",
        )),
        Err(e) => Err(EntityCreationError::new(
            name,
            format!("logger name pattern failed to compile: {e}"),
        )),
    }
}

/// Live world backed by a reloadable `tracing_subscriber::EnvFilter`.
///
/// Levels are tracked per logger name and every assignment re-renders the
/// filter directives and swaps them into the subscriber through the reload
/// handle. A detached registry keeps the bookkeeping without a subscriber.
pub struct TracingFilterRegistry<S = Registry> {
    loggers: InMemoryRegistry,
    fallback: LevelFilter,
    handle: Option<reload::Handle<EnvFilter, S>>,
}

impl<S: 'static> TracingFilterRegistry<S> {
    pub fn new(handle: reload::Handle<EnvFilter, S>, fallback: LevelFilter) -> Self {
        Self {
            loggers: InMemoryRegistry::new(),
            fallback,
            handle: Some(handle),
        }
    }

    pub fn detached(fallback: LevelFilter) -> Self {
        Self {
            loggers: InMemoryRegistry::new(),
            fallback,
            handle: None,
        }
    }

    /// Filter used when `root` is UNSET.
    pub fn fallback(&self) -> LevelFilter {
        self.fallback
    }

    /// Directive string for the current logger levels.
    pub fn directives(&self) -> String {
        LevelMap::from_registry(&self.loggers).to_filter_directives(self.fallback)
    }

    fn reload(&self, name: &str) -> Result<(), EntityCreationError> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };

        let directives = self.directives();
        let filter = EnvFilter::try_new(&directives).map_err(|e| {
            EntityCreationError::new(name, format!("invalid filter '{directives}': {e}"))
        })?;
        handle
            .reload(filter)
            .map_err(|e| EntityCreationError::new(name, format!("filter reload failed: {e}")))
    }
}

impl<S: 'static> LoggerRegistry for TracingFilterRegistry<S> {
    fn logger_names(&self) -> Vec<String> {
        self.loggers.logger_names()
    }

    fn level(&self, name: &str) -> Level {
        self.loggers.level(name)
    }

    fn set_level(&mut self, name: &str, level: Level) -> Result<(), EntityCreationError> {
        let previous = if self.loggers.contains(name) {
            Some(self.loggers.level(name))
        } else {
            validate_logger_name(name)?;
            None
        };

        self.loggers.set_level(name, level)?;
        if let Err(e) = self.reload(name) {
            match previous {
                Some(previous) => self.loggers.set_level(name, previous)?,
                None => {
                    self.loggers.remove(name);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}

impl<S> fmt::Debug for TracingFilterRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingFilterRegistry")
            .field("loggers", &self.loggers)
            .field("fallback", &self.fallback)
            .field("attached", &self.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_validate_logger_name() {
        for name in ["root", "app", "app.db", "my_crate.sub-module", "_private"] {
            assert!(validate_logger_name(name).is_ok(), "should accept {name}");
        }
        for name in ["", "app..db", ".app", "app.", "a=b", "a,b", "has space", "9lives"] {
            assert!(validate_logger_name(name).is_err(), "should reject {name}");
        }
    }

    #[test]
    fn test_detached_registry_renders_directives() {
        let mut registry: TracingFilterRegistry = TracingFilterRegistry::detached(LevelFilter::INFO);
        assert_eq!(registry.directives(), "info");

        registry.set_level("root", Level::WARNING).unwrap();
        registry.set_level("app.db", Level::DEBUG).unwrap();
        registry.set_level("app.http", Level::UNSET).unwrap();

        assert_eq!(registry.directives(), "warn,app::db=debug");
        assert_eq!(registry.level("app.http"), Level::UNSET);
        assert_eq!(registry.logger_names().len(), 3);
    }

    #[test]
    fn test_invalid_name_is_rejected_without_registering() {
        let mut registry: TracingFilterRegistry = TracingFilterRegistry::detached(LevelFilter::INFO);

        let error = registry.set_level("bad name", Level::DEBUG).unwrap_err();
        assert_eq!(error.name, "bad name");
        assert!(registry.logger_names().is_empty());
    }

    #[test]
    fn test_attached_registry_reloads_filter() {
        let (layer, handle) = reload::Layer::new(EnvFilter::new("info"));
        let subscriber = tracing_subscriber::registry().with(layer);
        let mut registry = TracingFilterRegistry::new(handle.clone(), LevelFilter::INFO);

        // The handle only reaches the filter while the subscriber is alive.
        let current = tracing::subscriber::with_default(subscriber, || {
            registry.set_level("app.db", Level::DEBUG).unwrap();
            registry.set_level("root", Level::ERROR).unwrap();
            handle.with_current(|filter| filter.to_string()).unwrap()
        });

        assert!(current.contains("app::db=debug"), "got {current}");
        assert!(current.contains("error"), "got {current}");

        // Subscriber is gone: the assignment fails and is rolled back.
        assert!(registry.set_level("late", Level::INFO).is_err());
        assert!(!registry.logger_names().contains(&"late".to_string()));
        assert!(registry.set_level("app.db", Level::ERROR).is_err());
        assert_eq!(registry.level("app.db"), Level::DEBUG);
    }
}
