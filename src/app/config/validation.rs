use super::{Config, ConfigError};
use crate::registry::validate_logger_name;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Initial levels must parse and name loggers the filter can target
        let levels = self.initial_levels()?;
        for name in levels.names() {
            validate_logger_name(name).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        }

        if let Some(path) = &self.config_file
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Config file path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
