//! MCP service implementation using rmcp.
//!
//! This module defines the GaussService struct, which advertises the
//! `execute_sql` tool and the table resources, and adapts MCP requests to the
//! dispatcher and resource catalog.

use crate::db::{Connector, PgConnector};
use crate::models::{
    EXECUTE_SQL_TOOL, ExecuteSqlInput, RESOURCE_MIME_TYPE, ResourceDescriptor, ToolRequest,
};
use crate::tools::{Dispatcher, ResourceCatalog};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListResourcesResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde_json::Value as JsonValue;
use std::future::Future;
use std::sync::Arc;

const TOOL_DESCRIPTION: &str = "Execute an SQL query on the openGauss server";

pub struct GaussService<C = PgConnector> {
    dispatcher: Arc<Dispatcher<C>>,
    catalog: Arc<ResourceCatalog<C>>,
}

impl<C> Clone for GaussService<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

impl<C: Connector> GaussService<C> {
    /// Create a new service.
    ///
    /// # Arguments
    ///
    /// * `connector` - Opens a fresh database session for every request
    /// * `database` - Database name, used to label the `\d` listing
    pub fn new(connector: C, database: impl Into<String>) -> Self {
        let connector = Arc::new(connector);
        Self {
            dispatcher: Arc::new(Dispatcher::new(connector.clone(), database)),
            catalog: Arc::new(ResourceCatalog::new(connector)),
        }
    }

    /// The tool catalog.
    pub fn tools(&self) -> Vec<Tool> {
        vec![Tool::new(
            EXECUTE_SQL_TOOL,
            TOOL_DESCRIPTION,
            execute_sql_schema(),
        )]
    }

    /// Run a tool call. Both successful and failed SQL come back as text
    /// content; malformed calls are MCP errors.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .dispatcher
            .dispatch(ToolRequest::new(name, arguments))
            .await?;
        Ok(CallToolResult::success(vec![Content::text(outcome.text())]))
    }

    pub async fn resources(&self) -> Vec<Resource> {
        self.catalog
            .list_resources()
            .await
            .into_iter()
            .map(to_resource)
            .collect()
    }

    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let text = self.catalog.read_resource(uri).await?;

        let mut contents = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(RESOURCE_MIME_TYPE.to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

fn to_resource(descriptor: ResourceDescriptor) -> Resource {
    let mut raw = RawResource::new(descriptor.uri, descriptor.name);
    raw.description = Some(descriptor.description);
    raw.mime_type = Some(descriptor.mime_type.to_string());
    raw.no_annotation()
}

/// JSON schema for the `execute_sql` arguments.
fn execute_sql_schema() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(ExecuteSqlInput)) {
        Ok(JsonValue::Object(schema)) => Arc::new(schema),
        _ => Arc::new(JsonObject::new()),
    }
}

impl<C: Connector + 'static> ServerHandler for GaussService<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "opengauss-mcp-server".to_owned(),
                title: Some("openGauss MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools and resources for an openGauss database.\n\
                \n\
                ## Resources\n\
                Every table of the public schema is listed as `opengauss://<table>/data`.\n\
                Reading one returns up to 100 rows as comma separated text.\n\
                \n\
                ## execute_sql\n\
                - SELECT statements return a header line followed by one line per row\n\
                - Other statements are committed and report the affected row count\n\
                - Meta-commands: `\\d` (tables), `\\dt` and `\\d+` (table details), `\\du` (roles)"
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move { Ok(ListToolsResult::with_all_items(self.tools())) }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.execute_tool(&request.name, request.arguments).await }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move { Ok(ListResourcesResult::with_all_items(self.resources().await)) }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { self.read(&request.uri).await }
    }
}
