//! Tables of the default schema exposed as readable resources.
//!
//! Every table is addressed as `opengauss://<table>/data`. A read returns at
//! most [`RESOURCE_ROW_LIMIT`] rows. The table name from the URI is checked
//! against the catalog before it is used, and is always sent as a quoted
//! identifier.

use crate::db::{Connector, Session};
use crate::error::{DbError, DbResult};
use crate::models::{RESOURCE_ROW_LIMIT, RESOURCE_SCHEME, ResourceDescriptor};
use crate::tools::meta::LIST_TABLES_SQL;
use sqlparser::ast::Ident;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ResourceCatalog<C> {
    connector: Arc<C>,
}

impl<C: Connector> ResourceCatalog<C> {
    pub fn new(connector: Arc<C>) -> Self {
        Self { connector }
    }

    /// Describe every table. Database failures are logged and yield no resources.
    pub async fn list_resources(&self) -> Vec<ResourceDescriptor> {
        match self.table_names().await {
            Ok(tables) => tables
                .iter()
                .map(|table| ResourceDescriptor::for_table(table))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Error listing resources");
                Vec::new()
            }
        }
    }

    /// Up to [`RESOURCE_ROW_LIMIT`] rows of the table named by `uri`.
    pub async fn read_resource(&self, uri: &str) -> DbResult<String> {
        let table = parse_table_uri(uri)?;
        debug!(uri, table, "Reading resource");

        let mut session = self.connector.open().await?;
        let result = read_table(&mut session, table).await;
        session.close().await;
        result
    }

    async fn table_names(&self) -> DbResult<Vec<String>> {
        let mut session = self.connector.open().await?;
        let result = session.fetch_column(LIST_TABLES_SQL).await;
        session.close().await;
        result
    }
}

async fn read_table<S: Session>(session: &mut S, table: &str) -> DbResult<String> {
    let known = session.fetch_column(LIST_TABLES_SQL).await?;
    if !known.iter().any(|name| name == table) {
        return Err(DbError::schema("Table not found", table));
    }

    let sql = format!(
        "SELECT * FROM {} LIMIT {}",
        quote_identifier(table),
        RESOURCE_ROW_LIMIT
    );
    let result = session.fetch(&sql).await?;
    Ok(result.to_text())
}

/// Table name from an `opengauss://<table>/...` URI. The scheme is matched
/// case-insensitively.
pub fn parse_table_uri(uri: &str) -> DbResult<&str> {
    let prefix = format!("{}://", RESOURCE_SCHEME);
    let rest = match uri.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(&prefix) => &uri[prefix.len()..],
        _ => return Err(DbError::invalid_input(format!("Invalid URI scheme: {}", uri))),
    };

    let table = rest.split_once('/').map_or(rest, |(table, _)| table);
    if table.is_empty() {
        return Err(DbError::invalid_input(format!(
            "Missing table name in URI: {}",
            uri
        )));
    }
    Ok(table)
}

/// Double-quoted identifier with embedded quotes doubled.
pub fn quote_identifier(name: &str) -> String {
    Ident::with_quote('"', name).to_string()
}
