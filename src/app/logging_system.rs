use super::config::LogFormat;
use crate::domain::{EntityCreationError, LevelMap};
use crate::reconcile::CreationPolicy;
use crate::registry::TracingFilterRegistry;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Invalid filter directives '{directives}': {source}")]
    InvalidFilter {
        directives: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Logging system initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Initial logger levels rejected: {0}")]
    InitialLevels(#[from] EntityCreationError),
}

/// Installs the global subscriber with a reloadable level filter.
///
/// The returned [`TracingFilterRegistry`] is the live world for the tool's
/// own loggers: applying a level map to it swaps the filter in place.
pub struct LoggingSystem {
    format: LogFormat,
    fallback: LevelFilter,
}

impl LoggingSystem {
    pub fn new(format: LogFormat, fallback: impl Into<LevelFilter>) -> Self {
        Self {
            format,
            fallback: fallback.into(),
        }
    }

    pub fn initialize(
        &self,
        initial: &LevelMap,
        policy: CreationPolicy,
    ) -> Result<TracingFilterRegistry, InitializationError> {
        let directives = initial.to_filter_directives(self.fallback);
        let env_filter =
            EnvFilter::try_new(&directives).map_err(|source| InitializationError::InvalidFilter {
                directives: directives.clone(),
                source,
            })?;
        let (filter_layer, handle) = reload::Layer::new(env_filter);

        // Logs go to stderr; stdout carries command output.
        let result = match self.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter_layer)
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter_layer)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        result.map_err(|e| InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        })?;

        let mut registry = TracingFilterRegistry::new(handle, self.fallback);
        let report = initial.apply_with_policy(&mut registry, policy)?;
        for rejected in &report.rejected {
            tracing::warn!(logger = %rejected.name, reason = %rejected.reason, "Initial level ignored");
        }

        Ok(registry)
    }
}
