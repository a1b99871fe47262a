//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::layout::ResolveLimits;

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Top-level configuration schema.
///
/// ```toml
/// [limits]
/// max_total_size = 1048576
/// max_array_len = 4096
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarStructConfig {
    /// Resolve limits.
    pub limits: Option<ResolveLimitsSpec>,
}

impl VarStructConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from the `VARSTRUCT_CONFIG` env var (if set),
    /// then apply `VARSTRUCT__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var("VARSTRUCT_CONFIG").ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(env::vars())
    }

    /// Apply `VARSTRUCT__section__field` style overrides from any key/value source.
    ///
    /// Keys without the `VARSTRUCT__` prefix are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(path) = key.strip_prefix("VARSTRUCT__") else {
                continue;
            };
            let path = path.to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim();

            match parts.as_slice() {
                ["limits", "max_total_size"] => {
                    self.limits_mut().max_total_size = Some(parse_value(&key, value)?);
                }
                ["limits", "max_array_len"] => {
                    self.limits_mut().max_array_len = Some(parse_value(&key, value)?);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Build `ResolveLimits` using defaults plus overrides.
    pub fn to_limits(&self) -> ResolveLimits {
        let mut limits = ResolveLimits::default();
        if let Some(spec) = &self.limits {
            spec.apply_to(&mut limits);
        }
        limits
    }

    fn limits_mut(&mut self) -> &mut ResolveLimitsSpec {
        self.limits.get_or_insert_with(ResolveLimitsSpec::default)
    }
}

/// Resolve limit overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveLimitsSpec {
    /// Largest accepted total size in bytes.
    pub max_total_size: Option<usize>,
    /// Largest accepted element count of one array field.
    pub max_array_len: Option<usize>,
}

impl ResolveLimitsSpec {
    fn apply_to(&self, limits: &mut ResolveLimits) {
        if let Some(value) = self.max_total_size {
            limits.max_total_size = Some(value);
        }
        if let Some(value) = self.max_array_len {
            limits.max_array_len = Some(value);
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
