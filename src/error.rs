//! Error types for the openGauss MCP Server.
//!
//! All runtime failures are expressed as [`DbError`]. Whether a failure is
//! reported to the agent as ordinary tool output or as a protocol error is
//! decided by the caller: the dispatcher turns database failures into text,
//! while argument and URI problems always surface as MCP errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Schema error: {message} (object: {object})")]
    Schema { message: String, object: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            object: object.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// The underlying message without the category prefix.
    ///
    /// For database and connection failures this is the driver's own text.
    pub fn detail(&self) -> String {
        match self {
            Self::Connection { message, .. } | Self::Database { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    /// True for malformed invocations, as opposed to failures of valid SQL.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::UnknownTool { .. } | Self::MissingArgument { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(
                msg.to_string(),
                "Check OPENGAUSS_HOST, OPENGAUSS_PORT and the credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::RowNotFound => DbError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DbError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DbError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::TypeNotFound { type_name } => DbError::schema(
                format!("Type not found: {}", type_name),
                type_name.to_string(),
            ),
            sqlx::Error::ColumnNotFound(col) => {
                DbError::schema(format!("Column not found: {}", col), col.to_string())
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert DbError to MCP ErrorData.
/// Includes the suggestion field in the `data` object when available.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        if err.is_protocol_error() {
            return rmcp::ErrorData::invalid_params(err.to_string(), None);
        }

        match &err {
            DbError::Schema { .. } => rmcp::ErrorData::resource_not_found(err.to_string(), None),

            DbError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            DbError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some(
                    "Consider raising --request-timeout or simplifying the query",
                )),
            ),

            DbError::Database {
                message,
                sql_state,
                suggestion,
            } => {
                let msg = match sql_state {
                    Some(code) => format!("Database error: {} (SQLSTATE: {})", message, code),
                    None => format!("Database error: {}", message),
                };
                rmcp::ErrorData::internal_error(msg, suggestion_data(Some(suggestion)))
            }

            _ => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::connection("Failed to connect", "Check credentials");
        assert!(err.to_string().contains("Connection failed"));
        assert_eq!(
            DbError::unknown_tool("drop_everything").to_string(),
            "Unknown tool: drop_everything"
        );
        assert_eq!(
            DbError::missing_argument("query").to_string(),
            "Missing required argument: query"
        );
    }

    #[test]
    fn test_error_suggestion() {
        let err = DbError::database(
            "Syntax error",
            Some("42601".to_string()),
            "Check SQL syntax",
        );
        assert_eq!(err.suggestion(), Some("Check SQL syntax"));
        assert_eq!(DbError::timeout("query", 5).suggestion(), None);
    }

    #[test]
    fn test_detail_drops_category_prefix() {
        let err = DbError::database("relation \"nope\" does not exist", None, "");
        assert_eq!(err.detail(), "relation \"nope\" does not exist");
        let err = DbError::connection("connection refused", "");
        assert_eq!(err.detail(), "connection refused");
        assert_eq!(
            DbError::timeout("query execution", 5).detail(),
            "Timeout: query execution exceeded 5s"
        );
    }

    #[test]
    fn test_protocol_error_classification() {
        assert!(DbError::unknown_tool("x").is_protocol_error());
        assert!(DbError::missing_argument("query").is_protocol_error());
        assert!(DbError::invalid_input("bad uri").is_protocol_error());
        assert!(!DbError::timeout("query", 5).is_protocol_error());
        assert!(!DbError::database("boom", None, "").is_protocol_error());
    }

    #[test]
    fn test_protocol_errors_map_to_invalid_params() {
        for err in [
            DbError::unknown_tool("x"),
            DbError::missing_argument("query"),
            DbError::invalid_input("bad uri"),
        ] {
            let mcp_err: rmcp::ErrorData = err.into();
            // invalid_params uses -32602
            assert_eq!(mcp_err.code.0, -32602);
        }
    }

    #[test]
    fn test_schema_maps_to_resource_not_found() {
        let err = DbError::schema("Table not found", "users");
        let mcp_err: rmcp::ErrorData = err.into();
        // resource_not_found uses -32002 in rmcp
        assert_eq!(mcp_err.code.0, -32002);
    }

    #[test]
    fn test_connection_and_timeout_map_to_internal_error() {
        let mcp_err: rmcp::ErrorData = DbError::connection("failed", "try again").into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
        let mcp_err: rmcp::ErrorData = DbError::timeout("query", 30).into();
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_database_error_includes_sql_state_and_suggestion() {
        let err = DbError::database(
            "relation \"nope\" does not exist",
            Some("42P01".to_string()),
            "check syntax",
        );
        let mcp_err: rmcp::ErrorData = err.into();
        assert!(mcp_err.message.contains("42P01"));
        assert!(mcp_err.message.starts_with("Database error: "));
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "check syntax");
    }
}
