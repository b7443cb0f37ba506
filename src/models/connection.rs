//! Connection-related data models.
//!
//! This module defines the immutable connection settings used to open a
//! fresh database connection for every request.

use std::fmt;
use std::time::Duration;

/// Default openGauss listen port.
pub const DEFAULT_PORT: u16 = 5432;

/// Settings for reaching the openGauss server.
///
/// Built once at startup and shared read-only. It describes how to connect;
/// it never holds a live connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Sensitive - never log
    pub password: String,
    pub database: String,
    /// Upper bound for connecting and for each statement. `None` means unbounded.
    pub request_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a connection configuration, rejecting missing credentials.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self, ConnectionConfigError> {
        let user = user.into();
        let password = password.into();
        let database = database.into();

        let missing: Vec<&'static str> = [
            ("user", user.is_empty()),
            ("password", password.is_empty()),
            ("database", database.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(ConnectionConfigError::MissingFields(missing.join(", ")));
        }

        Ok(Self {
            host: host.into(),
            port,
            user,
            password,
            database,
            request_timeout: None,
        })
    }

    /// Bound every connect and statement by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Display-safe description of the target (no password).
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Errors that can occur when creating a connection configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConnectionConfigError {
    /// One or more required settings are empty or absent
    #[error("Missing required database configuration: {0}")]
    MissingFields(String),
}
