use std::{env, fmt::Display, net::IpAddr, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}, expected compact or json")),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings, read from `INNKEEP_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// Channel capacity of every actor.
    pub actor_buffer: usize,
    pub log_format: LogFormat,
    pub admin_email: String,
    pub admin_name: String,
    pub max_stay_nights: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            actor_buffer: 64,
            log_format: LogFormat::Compact,
            admin_email: "admin@innkeep.local".to_string(),
            admin_name: "Administrator".to_string(),
            max_stay_nights: 30,
        }
    }
}

impl Config {
    /// Unset or unparsable variables fall back to their defaults with a warning.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            bind: try_load("INNKEEP_BIND", defaults.bind),
            port: try_load("INNKEEP_PORT", defaults.port),
            actor_buffer: try_load("INNKEEP_ACTOR_BUFFER", defaults.actor_buffer),
            log_format: try_load("INNKEEP_LOG_FORMAT", defaults.log_format),
            admin_email: try_load("INNKEEP_ADMIN_EMAIL", defaults.admin_email),
            admin_name: try_load("INNKEEP_ADMIN_NAME", defaults.admin_name),
            max_stay_nights: try_load("INNKEEP_MAX_STAY_NIGHTS", defaults.max_stay_nights),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer == 0 {
            return Err(ConfigError::Invalid("INNKEEP_ACTOR_BUFFER must be at least 1".to_string()));
        }
        if self.max_stay_nights < 1 {
            return Err(ConfigError::Invalid("INNKEEP_MAX_STAY_NIGHTS must be at least 1".to_string()));
        }
        if !self.admin_email.contains('@') {
            return Err(ConfigError::Invalid(format!(
                "INNKEEP_ADMIN_EMAIL {:?} is not an email address",
                self.admin_email
            )));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default {default:?}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default:?}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" compact ".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("pretty".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_rejects_nonsense() {
        let config = Config { actor_buffer: 0, ..Config::default() };
        assert!(config.validate().is_err());
        let config = Config { admin_email: "root".into(), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        // Key is unique to this test so parallel tests do not race on it.
        env::set_var("INNKEEP_TEST_ONLY_PORT", "not-a-port");
        assert_eq!(try_load::<u16>("INNKEEP_TEST_ONLY_PORT", 8080), 8080);
        env::set_var("INNKEEP_TEST_ONLY_PORT", "9090");
        assert_eq!(try_load::<u16>("INNKEEP_TEST_ONLY_PORT", 8080), 9090);
        assert_eq!(try_load::<u16>("INNKEEP_TEST_ONLY_UNSET", 7), 7);
    }
}
