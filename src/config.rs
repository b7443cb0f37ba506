//! Configuration handling for the openGauss MCP Server.
//!
//! Settings come from command line flags with environment variable fallbacks.
//! The parsed [`Config`] is turned into an immutable [`ConnectionConfig`] once
//! at startup and handed to every component explicitly.

use crate::models::{ConnectionConfig, ConnectionConfigError, DEFAULT_PORT};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the openGauss MCP Server.
#[derive(Clone, Parser)]
#[command(
    name = "opengauss-mcp-server",
    about = "MCP server for openGauss - lets AI assistants browse tables and run SQL",
    version,
    author
)]
pub struct Config {
    /// Database server host
    #[arg(long, default_value = DEFAULT_HOST, env = "OPENGAUSS_HOST")]
    pub host: String,

    /// Database server port
    #[arg(long, default_value_t = DEFAULT_PORT, env = "OPENGAUSS_PORT")]
    pub port: u16,

    /// Database user (required)
    #[arg(long, env = "OPENGAUSS_USER")]
    pub user: Option<String>,

    /// Database password (required)
    #[arg(long, env = "OPENGAUSS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name (required)
    #[arg(long = "dbname", env = "OPENGAUSS_DBNAME")]
    pub dbname: Option<String>,

    /// Deadline in seconds for connecting and for each statement.
    /// Unset or 0 leaves database calls unbounded.
    #[arg(long, value_name = "SECS", env = "OPENGAUSS_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: None,
            password: None,
            dbname: None,
            request_timeout: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }

    /// Get the request deadline as a Duration.
    pub fn request_timeout_duration(&self) -> Option<Duration> {
        self.request_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Build the validated connection settings.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConnectionConfigError> {
        let config = ConnectionConfig::new(
            self.host.clone(),
            self.port,
            self.user.clone().unwrap_or_default(),
            self.password.clone().unwrap_or_default(),
            self.dbname.clone().unwrap_or_default(),
        )?;
        Ok(config.with_request_timeout(self.request_timeout_duration()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("dbname", &self.dbname)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> Config {
        Config {
            user: Some("gauss".to_string()),
            password: Some("Secret@123".to_string()),
            dbname: Some("postgres".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 5432);
        assert_eq!(config.log_level, "info");
        assert!(config.request_timeout_duration().is_none());
    }

    #[test]
    fn test_connection_config_from_complete_settings() {
        let conn = complete_config().connection_config().unwrap();
        assert_eq!(conn.host, "localhost");
        assert_eq!(conn.port, 5432);
        assert_eq!(conn.user, "gauss");
        assert_eq!(conn.database, "postgres");
    }

    #[test]
    fn test_missing_required_settings_rejected() {
        let err = Config::default().connection_config().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("user"));
        assert!(msg.contains("password"));
        assert!(msg.contains("database"));

        let config = Config {
            password: None,
            ..complete_config()
        };
        assert!(config.connection_config().is_err());
    }

    #[test]
    fn test_request_timeout() {
        let config = Config {
            request_timeout: Some(15),
            ..complete_config()
        };
        assert_eq!(
            config.connection_config().unwrap().request_timeout,
            Some(Duration::from_secs(15))
        );

        let config = Config {
            request_timeout: Some(0),
            ..complete_config()
        };
        assert!(config.request_timeout_duration().is_none());
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::try_parse_from([
            "opengauss-mcp-server",
            "--host",
            "10.0.0.7",
            "--port",
            "26000",
            "--user",
            "omm",
            "--password",
            "pw",
            "--dbname",
            "finance",
            "--request-timeout",
            "20",
        ])
        .unwrap();
        assert_eq!(config.host, "10.0.0.7");
        assert_eq!(config.port, 26000);
        assert_eq!(config.dbname.as_deref(), Some("finance"));
        assert_eq!(config.request_timeout, Some(20));
    }

    #[test]
    fn test_debug_masks_password() {
        let debug = format!("{:?}", complete_config());
        assert!(!debug.contains("Secret@123"));
    }
}
