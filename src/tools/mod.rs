//! Request handling behind the MCP surface.
//!
//! - `dispatch`: the `execute_sql` tool
//! - `meta`: psql-style meta-commands (`\d`, `\dt`, `\d+`, `\du`)
//! - `resources`: listing and reading table resources
//! - `format`: rendering of tabular results as text

pub mod dispatch;
pub mod format;
pub mod meta;
pub mod resources;

pub use dispatch::Dispatcher;
pub use format::format_rows;
pub use meta::MetaCommand;
pub use resources::ResourceCatalog;
