//! Per-request database connections.
//!
//! Every request opens its own connection through a [`Connector`] and gets a
//! [`Session`] over it. Callers close the session once their work is done,
//! whether it succeeded or not; a session dropped without `close` (deadline
//! expiry, shutdown) still releases its socket when the connection is dropped.
//!
//! When a request timeout is configured, connecting and every statement are
//! bounded by it. There is no retry and no pooling.

use crate::db::types::RowToText;
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, TabularResult};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Column, Connection, Either, Executor};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Opens database sessions.
pub trait Connector: Send + Sync {
    type Session: Session;

    /// Open a new connection. Never reuses an earlier one.
    fn open(&self) -> impl Future<Output = DbResult<Self::Session>> + Send;
}

/// Statement execution over a single open connection.
pub trait Session: Send {
    /// Run a row-returning statement and collect every row as text.
    fn fetch(&mut self, sql: &str) -> impl Future<Output = DbResult<TabularResult>> + Send;

    /// Run a statement in its own transaction, commit, and return the affected row count.
    fn execute_and_commit(&mut self, sql: &str) -> impl Future<Output = DbResult<u64>> + Send;

    /// Close the connection.
    fn close(self) -> impl Future<Output = ()> + Send;

    /// First column of every row.
    fn fetch_column(&mut self, sql: &str) -> impl Future<Output = DbResult<Vec<String>>> + Send {
        async move {
            let result = self.fetch(sql).await?;
            Ok(result
                .rows
                .into_iter()
                .filter_map(|row| row.into_iter().next())
                .collect())
        }
    }
}

// =============================================================================
// openGauss Implementation
// =============================================================================

/// Connects to openGauss over the PostgreSQL wire protocol.
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: ConnectionConfig,
}

impl PgConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(&self.config.database)
    }
}

impl Connector for PgConnector {
    type Session = PgSession;

    async fn open(&self) -> DbResult<PgSession> {
        let deadline = self.config.request_timeout;
        let options = self.connect_options();
        let conn = bounded(deadline, "connect", PgConnection::connect_with(&options)).await?;
        debug!(target_db = %self.config.target(), "Opened database connection");
        Ok(PgSession { conn, deadline })
    }
}

/// A live openGauss connection.
pub struct PgSession {
    conn: PgConnection,
    deadline: Option<Duration>,
}

impl Session for PgSession {
    async fn fetch(&mut self, sql: &str) -> DbResult<TabularResult> {
        use futures_util::TryStreamExt;

        let items = bounded(
            self.deadline,
            "query execution",
            (&mut self.conn)
                .fetch_many(sqlx::raw_sql(sql))
                .try_collect::<Vec<_>>(),
        )
        .await?;
        let rows = last_result_set(items);

        let columns = match rows.first() {
            Some(row) => row.column_names(),
            // No row to read names from: ask the server to describe the statement.
            // Multi-statement text cannot be described and yields no header.
            None => match bounded(
                self.deadline,
                "statement describe",
                (&mut self.conn).describe(sql),
            )
            .await
            {
                Ok(described) => described
                    .columns()
                    .iter()
                    .map(|col| col.name().to_string())
                    .collect(),
                Err(e) => {
                    debug!(error = %e, "Could not describe empty result set");
                    Vec::new()
                }
            },
        };

        let rows = rows.iter().map(RowToText::to_text_cells).collect();
        Ok(TabularResult::new(columns, rows))
    }

    async fn execute_and_commit(&mut self, sql: &str) -> DbResult<u64> {
        let deadline = self.deadline;
        let mut tx = bounded(deadline, "begin transaction", self.conn.begin()).await?;
        let conn: &mut PgConnection = &mut tx;
        let done = bounded(
            deadline,
            "statement execution",
            conn.execute(sqlx::raw_sql(sql)),
        )
        .await?;
        bounded(deadline, "commit", tx.commit()).await?;
        Ok(done.rows_affected())
    }

    async fn close(self) {
        let deadline = self.deadline;
        if let Err(e) = bounded(deadline, "close", self.conn.close()).await {
            debug!(error = %e, "Database connection did not close cleanly");
        }
    }
}

/// Rows of the final statement in a `fetch_many` stream.
///
/// Every statement ends with its completion result, so rows seen before the
/// last completion belong to earlier statements and are discarded.
fn last_result_set<Q, R>(items: Vec<Either<Q, R>>) -> Vec<R> {
    let mut last = Vec::new();
    let mut current = Vec::new();
    for item in items {
        match item {
            Either::Left(_) => last = std::mem::take(&mut current),
            Either::Right(row) => current.push(row),
        }
    }
    if current.is_empty() { last } else { current }
}

/// Await a driver future, bounded by `deadline` when one is set.
async fn bounded<T, F>(deadline: Option<Duration>, operation: &str, fut: F) -> DbResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match deadline {
        Some(limit) => match timeout(limit, fut).await {
            Ok(result) => result.map_err(DbError::from),
            Err(_) => Err(DbError::timeout(operation, limit.as_secs())),
        },
        None => fut.await.map_err(DbError::from),
    }
}
