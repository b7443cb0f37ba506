//! Resource descriptors for tables exposed over MCP.

use serde::Serialize;

/// URI scheme identifying this backend. Matched case-insensitively.
pub const RESOURCE_SCHEME: &str = "opengauss";

/// Every table resource is served as plain text.
pub const RESOURCE_MIME_TYPE: &str = "text/plain";

/// A table exposed as a readable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub mime_type: &'static str,
    pub description: String,
}

impl ResourceDescriptor {
    /// Describe a table of the default schema.
    pub fn for_table(table: &str) -> Self {
        Self {
            uri: format!("{}://{}/data", RESOURCE_SCHEME, table),
            name: format!("Table: {}", table),
            mime_type: RESOURCE_MIME_TYPE,
            description: format!("Data in table: {}", table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_for_table() {
        let desc = ResourceDescriptor::for_table("orders");
        assert_eq!(desc.uri, "opengauss://orders/data");
        assert_eq!(desc.name, "Table: orders");
        assert_eq!(desc.mime_type, "text/plain");
        assert_eq!(desc.description, "Data in table: orders");
    }
}
