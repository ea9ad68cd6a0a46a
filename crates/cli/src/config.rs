//! Configuration loaded from environment variables.

use domain::{LocationRole, LocationRoles};

use crate::error::CliError;

/// Output format of the log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(CliError::Config(format!(
                "WAREHOUSE_LOG_FORMAT must be 'pretty' or 'json', got '{other}'"
            ))),
        }
    }
}

/// Host configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `WAREHOUSE_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `WAREHOUSE_RECEIVE_LOCATION`, `WAREHOUSE_SHIP_LOCATION`,
///   `WAREHOUSE_ASSEMBLE_LOCATION`: names of the well-known locations
///   (default: `Receive`, `Ship`, `Assemble`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_filter: String,
    pub log_format: LogFormat,
    pub roles: LocationRoles,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let mut roles = LocationRoles::default();
        for (key, role) in [
            ("WAREHOUSE_RECEIVE_LOCATION", LocationRole::Receive),
            ("WAREHOUSE_SHIP_LOCATION", LocationRole::Ship),
            ("WAREHOUSE_ASSEMBLE_LOCATION", LocationRole::Assemble),
        ] {
            if let Some(name) = lookup(key) {
                if name.trim().is_empty() {
                    return Err(CliError::Config(format!("{key} must not be empty")));
                }
                roles = roles.with_name(role, name);
            }
        }

        let log_format = match lookup("WAREHOUSE_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format,
            roles,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::Pretty,
            roles: LocationRoles::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.roles.name(LocationRole::Ship), "Ship");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("RUST_LOG", "debug,domain=trace"),
            ("WAREHOUSE_LOG_FORMAT", "JSON"),
            ("WAREHOUSE_RECEIVE_LOCATION", "Dock 1"),
            ("WAREHOUSE_ASSEMBLE_LOCATION", "Workshop"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "debug,domain=trace");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.roles.name(LocationRole::Receive), "Dock 1");
        assert_eq!(config.roles.name(LocationRole::Ship), "Ship");
        assert_eq!(config.roles.name(LocationRole::Assemble), "Workshop");
    }

    #[test]
    fn test_invalid_log_format() {
        let result = Config::from_lookup(lookup_in(&[("WAREHOUSE_LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_empty_location_name() {
        let result = Config::from_lookup(lookup_in(&[("WAREHOUSE_SHIP_LOCATION", "  ")]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
