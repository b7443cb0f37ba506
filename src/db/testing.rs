//! In-memory connector for unit tests.
//!
//! Records every opened session, closed session and statement, serves canned
//! results keyed by exact SQL text, and can be told to fail on connect or on
//! any statement containing a given fragment.

use crate::db::gateway::{Connector, Session};
use crate::error::{DbError, DbResult};
use crate::models::TabularResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SpyState {
    opens: AtomicUsize,
    closes: AtomicUsize,
    statements: Mutex<Vec<String>>,
    results: Mutex<HashMap<String, TabularResult>>,
    rows_affected: AtomicUsize,
    fail_open: Mutex<Option<String>>,
    fail_on: Mutex<Option<(String, String)>>,
}

#[derive(Clone, Default)]
pub struct SpyConnector {
    state: Arc<SpyState>,
}

impl SpyConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `result` for statements equal to `sql`.
    pub fn with_result(self, sql: &str, result: TabularResult) -> Self {
        self.state
            .results
            .lock()
            .unwrap()
            .insert(sql.to_string(), result);
        self
    }

    pub fn with_rows_affected(self, count: usize) -> Self {
        self.state.rows_affected.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_open(self, message: &str) -> Self {
        *self.state.fail_open.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Fail every statement whose text contains `fragment`.
    pub fn failing_on(self, fragment: &str, message: &str) -> Self {
        *self.state.fail_on.lock().unwrap() = Some((fragment.to_string(), message.to_string()));
        self
    }

    pub fn opens(&self) -> usize {
        self.state.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.statements.lock().unwrap().clone()
    }
}

impl Connector for SpyConnector {
    type Session = SpySession;

    async fn open(&self) -> DbResult<SpySession> {
        let failure = self.state.fail_open.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(DbError::connection(message, "Check the server"));
        }
        self.state.opens.fetch_add(1, Ordering::SeqCst);
        Ok(SpySession {
            state: self.state.clone(),
        })
    }
}

pub struct SpySession {
    state: Arc<SpyState>,
}

impl SpySession {
    fn record(&self, sql: &str) -> DbResult<()> {
        self.state.statements.lock().unwrap().push(sql.to_string());
        match self.state.fail_on.lock().unwrap().as_ref() {
            Some((fragment, message)) if sql.contains(fragment.as_str()) => Err(DbError::database(
                message.clone(),
                Some("42P01".to_string()),
                "Check the SQL syntax and referenced objects",
            )),
            _ => Ok(()),
        }
    }
}

impl Session for SpySession {
    async fn fetch(&mut self, sql: &str) -> DbResult<TabularResult> {
        self.record(sql)?;
        let result = self.state.results.lock().unwrap().get(sql).cloned();
        Ok(result.unwrap_or_default())
    }

    async fn execute_and_commit(&mut self, sql: &str) -> DbResult<u64> {
        self.record(sql)?;
        Ok(self.state.rows_affected.load(Ordering::SeqCst) as u64)
    }

    async fn close(self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}
