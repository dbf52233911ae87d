use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Unset means an in-memory store.
    pub db_path: Option<PathBuf>,
    pub geocoder_table: Option<PathBuf>,
    pub environment: Environment,
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            db_path: None,
            geocoder_table: None,
            environment: Environment::default(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("BOOTCAMPS_HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        config.db_path = get("BOOTCAMPS_DB_PATH").map(PathBuf::from);
        config.geocoder_table = get("BOOTCAMPS_GEOCODER_TABLE").map(PathBuf::from);
        if let Some(env) = get("BOOTCAMPS_ENV") {
            config.environment = parse("BOOTCAMPS_ENV", &env)?;
        }
        if let Some(secs) = get("BOOTCAMPS_SHUTDOWN_TIMEOUT_SECS") {
            config.shutdown_timeout =
                Duration::from_secs(parse("BOOTCAMPS_SHUTDOWN_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("PORT", "8080"),
            ("BOOTCAMPS_HOST", "127.0.0.1"),
            ("BOOTCAMPS_DB_PATH", "/var/lib/bootcamps.redb"),
            ("BOOTCAMPS_GEOCODER_TABLE", "zipcodes.json"),
            ("BOOTCAMPS_ENV", "production"),
            ("BOOTCAMPS_SHUTDOWN_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/bootcamps.redb")));
        assert_eq!(config.geocoder_table, Some(PathBuf::from("zipcodes.json")));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(3));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("PORT", ""), ("BOOTCAMPS_DB_PATH", "  ")]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn rejects_invalid_port() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = config(&[("PORT", "70000")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid value for PORT"));
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = config(&[("BOOTCAMPS_ENV", "staging")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BOOTCAMPS_ENV", .. }));
    }
}
