//! psql-style meta-commands.
//!
//! A query whose trimmed text starts with a backslash is a meta-command. The
//! recognized directives are matched exactly and each maps to a fixed catalog
//! query; the result is labelled with a fixed header rather than the catalog's
//! own column names.

use crate::db::Session;
use crate::error::DbResult;

/// Tables of the default schema.
pub const LIST_TABLES_SQL: &str = "SELECT tablename FROM pg_tables WHERE schemaname = 'public'";

const LIST_TABLES_DETAILED_SQL: &str =
    "SELECT tablename, tableowner, tablespace FROM pg_tables WHERE schemaname = 'public'";

const LIST_TABLES_EXTENDED_SQL: &str = "SELECT tablename, tableowner, tablespace, hasindexes, \
     hasrules, hastriggers FROM pg_tables WHERE schemaname = 'public'";

const LIST_ROLES_SQL: &str = "SELECT rolname, rolsuper, rolinherit, rolcreaterole, rolcreatedb, \
     rolcanlogin FROM pg_roles";

const DETAILED_HEADERS: [&str; 3] = ["Table", "Owner", "Tablespace"];

const EXTENDED_HEADERS: [&str; 6] = [
    "Table",
    "Owner",
    "Tablespace",
    "Has Indexes",
    "Has Rules",
    "Has Triggers",
];

const ROLE_HEADERS: [&str; 6] = [
    "Role",
    "Superuser",
    "Inherit",
    "Create Role",
    "Create DB",
    "Can Login",
];

/// A backslash directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    /// `\d`
    ListTables,
    /// `\dt`
    ListTablesDetailed,
    /// `\d+`
    ListTablesExtended,
    /// `\du`
    ListRoles,
    Unsupported(String),
}

impl MetaCommand {
    /// Classify an already trimmed query.
    pub fn parse(trimmed: &str) -> Self {
        match trimmed {
            "\\d" => Self::ListTables,
            "\\dt" => Self::ListTablesDetailed,
            "\\d+" => Self::ListTablesExtended,
            "\\du" => Self::ListRoles,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Catalog query backing this directive, if it has one.
    pub fn catalog_query(&self) -> Option<&'static str> {
        match self {
            Self::ListTables => Some(LIST_TABLES_SQL),
            Self::ListTablesDetailed => Some(LIST_TABLES_DETAILED_SQL),
            Self::ListTablesExtended => Some(LIST_TABLES_EXTENDED_SQL),
            Self::ListRoles => Some(LIST_ROLES_SQL),
            Self::Unsupported(_) => None,
        }
    }

    /// Header labels for the directive's output.
    pub fn headers(&self, database: &str) -> Vec<String> {
        let fixed: &[&str] = match self {
            Self::ListTables => return vec![format!("Tables_in_{}", database)],
            Self::ListTablesDetailed => &DETAILED_HEADERS,
            Self::ListTablesExtended => &EXTENDED_HEADERS,
            Self::ListRoles => &ROLE_HEADERS,
            Self::Unsupported(_) => &[],
        };
        fixed.iter().map(|h| h.to_string()).collect()
    }
}

/// Run a meta-command and render its output.
///
/// Unsupported directives produce an explanatory line without touching the
/// session.
pub async fn interpret<S: Session>(
    session: &mut S,
    trimmed: &str,
    database: &str,
) -> DbResult<String> {
    let command = MetaCommand::parse(trimmed);
    let Some(sql) = command.catalog_query() else {
        return Ok(format!("Unsupported meta-command: {}", trimmed));
    };

    let result = session.fetch(sql).await?;
    Ok(result.with_columns(command.headers(database)).to_text())
}
