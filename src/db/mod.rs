//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Per-request connections with optional deadlines
//! - Rendering of row values as text cells

pub mod gateway;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{Connector, PgConnector, PgSession, Session};
pub use types::{RowToText, TypeCategory};
