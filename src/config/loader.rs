//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProbeConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML file without validating it.
///
/// Binaries apply command-line overrides before calling [`validate_config`](crate::config::validate_config).
pub fn read_config(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProbeConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
    tracing::debug!(path = %path.display(), "Configuration file read");
    Ok(config)
}

/// Read `path` when given, otherwise start from defaults.
pub fn read_or_default(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    match path {
        Some(path) => read_config(path),
        None => Ok(ProbeConfig::default()),
    }
}
