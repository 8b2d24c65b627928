use super::{ConfigError, LogFormat, LogLevel};
use crate::codec::WireFormat;
use crate::domain::LevelMap;
use crate::reconcile::CreationPolicy;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Level for the tool's own output when `root` has no explicit level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "RUST_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// Initial logger levels for the tool itself, e.g. `rask_logger_control.reconcile=debug`
    #[arg(long, env = "LOGGER_LEVELS")]
    pub levels: Option<String>,

    /// What to do when a logger cannot be created
    #[arg(long, env = "CREATION_POLICY", default_value = "fail-fast")]
    pub creation_policy: CreationPolicy,

    /// Encoding of level map files read and written by the commands
    #[arg(long, env = "WIRE_FORMAT", default_value = "json")]
    pub wire_format: WireFormat,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    #[serde(skip)]
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the entries of TARGET whose level differs from BASE
    Diff { target: PathBuf, base: PathBuf },

    /// Print BASE with every entry of DIFF laid over it
    ApplyDiff { base: PathBuf, diff: PathBuf },

    /// Apply DESIRED to a registry holding CURRENT and report what changed
    Reconcile {
        current: PathBuf,
        desired: PathBuf,
        /// Only report whether anything would change
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the EnvFilter directives a level map renders to
    Filter { map: PathBuf },

    /// Print the tool's own logger levels
    Levels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            levels: None,
            creation_policy: CreationPolicy::FailFast,
            wire_format: WireFormat::Json,
            config_file: None,
            command: None,
        }
    }
}

impl Config {
    /// Parse arguments (with env fallbacks). When a config file is given its
    /// settings replace the parsed ones; the command always comes from the
    /// arguments.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::try_parse_from(args)?;

        let config = match config.config_file.clone() {
            Some(path) => Config {
                command: config.command,
                ..Self::from_file(&path)?
            }
            .with_config_file(path),
            None => config,
        };

        config.validate()?;
        Ok(config)
    }

    fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Logger levels the tool applies to itself at startup.
    pub fn initial_levels(&self) -> Result<LevelMap, ConfigError> {
        match &self.levels {
            Some(directives) => LevelMap::parse_directives(directives).map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid levels '{directives}': {e}"))
            }),
            None => Ok(LevelMap::new()),
        }
    }
}
