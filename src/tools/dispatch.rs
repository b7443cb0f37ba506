//! The `execute_sql` tool.
//!
//! A call is validated before any connection is opened. Valid calls run on a
//! fresh session and always yield a [`ToolOutcome`]: database failures become
//! [`ToolOutcome::SoftError`] so the agent sees them as text. Only malformed
//! calls (unknown tool, missing `query`) are returned as errors.

use crate::db::{Connector, Session};
use crate::error::{DbError, DbResult};
use crate::models::{EXECUTE_SQL_TOOL, ToolOutcome, ToolRequest};
use crate::tools::meta;
use std::sync::Arc;
use tracing::{error, info};

pub struct Dispatcher<C> {
    connector: Arc<C>,
    database: String,
}

impl<C: Connector> Dispatcher<C> {
    /// `database` labels the `\d` listing.
    pub fn new(connector: Arc<C>, database: impl Into<String>) -> Self {
        Self {
            connector,
            database: database.into(),
        }
    }

    pub async fn dispatch(&self, request: ToolRequest) -> DbResult<ToolOutcome> {
        if request.name != EXECUTE_SQL_TOOL {
            return Err(DbError::unknown_tool(request.name));
        }
        let Some(query) = request.query() else {
            return Err(DbError::missing_argument("query"));
        };

        info!(tool = %request.name, query, "Executing tool call");

        let outcome = match self.run(query).await {
            Ok(text) => ToolOutcome::Success(text),
            Err(e) => {
                error!(error = %e, query, "Error executing SQL");
                ToolOutcome::SoftError(e.detail())
            }
        };
        Ok(outcome)
    }

    async fn run(&self, query: &str) -> DbResult<String> {
        let mut session = self.connector.open().await?;
        let result = self.run_in_session(&mut session, query).await;
        session.close().await;
        result
    }

    async fn run_in_session(&self, session: &mut C::Session, query: &str) -> DbResult<String> {
        let trimmed = query.trim();
        if trimmed.starts_with('\\') {
            return meta::interpret(session, trimmed, &self.database).await;
        }

        if is_select(trimmed) {
            let result = session.fetch(query).await?;
            Ok(result.to_text())
        } else {
            let affected = session.execute_and_commit(query).await?;
            Ok(format!(
                "Query executed successfully. Rows affected: {}",
                affected
            ))
        }
    }
}

/// Leading-keyword check; `SELECT` in any case.
fn is_select(trimmed: &str) -> bool {
    trimmed
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}
