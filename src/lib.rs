//! openGauss MCP Server Library
//!
//! This library exposes an openGauss database to MCP (Model Context Protocol)
//! clients: tables as readable resources and an `execute_sql` tool that also
//! understands a few psql meta-commands.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::GaussService;
