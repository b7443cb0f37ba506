//! Data models for the openGauss MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod resource;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionConfigError, DEFAULT_PORT};
pub use query::{
    EXECUTE_SQL_TOOL, ExecuteSqlInput, RESOURCE_ROW_LIMIT, TabularResult, ToolOutcome,
    ToolRequest,
};
pub use resource::{RESOURCE_MIME_TYPE, RESOURCE_SCHEME, ResourceDescriptor};
