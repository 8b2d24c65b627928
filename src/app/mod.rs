pub mod config;
pub mod logging_system;
pub mod runner;

pub use config::{Command, Config, ConfigError, LogFormat, LogLevel};
pub use logging_system::{InitializationError, LoggingSystem};
pub use runner::{CommandRunner, ReconcileOutcome};

use crate::codec::LevelMapCodec;
use crate::registry::TracingFilterRegistry;
use anyhow::{Context, bail};
use std::io::Write;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

pub struct App {
    config: Config,
    loggers: TracingFilterRegistry,
    runner: CommandRunner,
}

impl App {
    pub fn from_args<I, T>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args(args)?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let fallback = LevelFilter::from(tracing::Level::from(config.log_level));
        let initial = config.initial_levels()?;

        let loggers = LoggingSystem::new(config.log_format, fallback)
            .initialize(&initial, config.creation_policy)
            .context("Failed to initialize logging")?;

        info!("Starting rask-logger-control v{}", get_version());
        info!(
            "Configuration: wire_format={:?}, creation_policy={:?}, loggers={}",
            config.wire_format,
            config.creation_policy,
            loggers.directives()
        );

        let runner = CommandRunner::new(
            LevelMapCodec::new(config.wire_format),
            config.creation_policy,
            fallback,
        );

        Ok(Self {
            config,
            loggers,
            runner,
        })
    }

    pub fn run(self) -> anyhow::Result<()> {
        let Some(command) = &self.config.command else {
            bail!("No command given. Run with --help for usage.");
        };

        let output = self
            .runner
            .run(command, &self.loggers)
            .with_context(|| format!("Command {command:?} failed"))?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output)?;
        stdout.flush()?;
        Ok(())
    }

    /// The tool's own live logger registry.
    pub fn loggers_mut(&mut self) -> &mut TracingFilterRegistry {
        &mut self.loggers
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub fn main() -> anyhow::Result<()> {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        // --help, --version and usage errors
        Err(ConfigError::ArgError(e)) => e.exit(),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    let app = App::from_config(config)?;
    if let Err(e) = app.run() {
        error!("Application error: {e:#}");
        process::exit(1);
    }

    Ok(())
}
