//! Query-related data models.
//!
//! This module defines the tool request shape, tabular results and the
//! outcome of a tool call.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// The only tool this server advertises.
pub const EXECUTE_SQL_TOOL: &str = "execute_sql";

/// Row cap applied when reading a table resource.
pub const RESOURCE_ROW_LIMIT: u32 = 100;

/// Input for the execute_sql tool. Used to publish the tool's input schema.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL query to execute
    pub query: String,
}

/// A tool invocation as received from the protocol layer.
#[derive(Debug, Clone, Default)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: Option<Map<String, JsonValue>>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Option<Map<String, JsonValue>>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Convenience constructor for an execute_sql call.
    pub fn execute_sql(query: impl Into<String>) -> Self {
        let mut arguments = Map::new();
        arguments.insert("query".to_string(), JsonValue::String(query.into()));
        Self::new(EXECUTE_SQL_TOOL, Some(arguments))
    }

    /// The `query` argument if present as a non-empty string.
    pub fn query(&self) -> Option<&str> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get("query"))
            .and_then(JsonValue::as_str)
            .filter(|q| !q.is_empty())
    }
}

/// Column names plus stringified rows.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Replace the column labels, keeping the rows.
    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a well-formed tool call.
///
/// Both variants are delivered to the agent as ordinary text; malformed calls
/// never produce an outcome and are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    /// The SQL failed; carries the underlying error message.
    SoftError(String),
}

impl ToolOutcome {
    /// Text delivered to the agent.
    pub fn text(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::SoftError(message) => format!("Error executing query: {}", message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_request_query() {
        let request = ToolRequest::execute_sql("SELECT 1");
        assert_eq!(request.name, EXECUTE_SQL_TOOL);
        assert_eq!(request.query(), Some("SELECT 1"));
    }

    #[test]
    fn test_tool_request_query_rejects_bad_shapes() {
        assert_eq!(ToolRequest::new(EXECUTE_SQL_TOOL, None).query(), None);
        assert_eq!(ToolRequest::execute_sql("").query(), None);

        let args = json!({ "query": 42 }).as_object().cloned();
        assert_eq!(ToolRequest::new(EXECUTE_SQL_TOOL, args).query(), None);

        let args = json!({ "sql": "SELECT 1" }).as_object().cloned();
        assert_eq!(ToolRequest::new(EXECUTE_SQL_TOOL, args).query(), None);
    }

    #[test]
    fn test_outcome_text() {
        assert_eq!(ToolOutcome::Success("a,b".into()).text(), "a,b");
        let soft = ToolOutcome::SoftError("boom".into());
        assert_eq!(soft.text(), "Error executing query: boom");
        assert!(!soft.is_success());
    }

    #[test]
    fn test_with_columns_relabels() {
        let result = TabularResult::new(
            vec!["rolname".into()],
            vec![vec!["gaussdb".into()]],
        )
        .with_columns(["Role"]);
        assert_eq!(result.columns, vec!["Role"]);
        assert_eq!(result.rows, vec![vec!["gaussdb".to_string()]]);
    }

    #[test]
    fn test_input_schema_requires_query() {
        let schema = serde_json::to_value(schemars::schema_for!(ExecuteSqlInput)).unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["required"], json!(["query"]));
    }
}
