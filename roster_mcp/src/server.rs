//! Core MCP server implementation for Roster.

use std::net::SocketAddr;

use log::{debug, info, warn};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    handler::server::{tool::ToolCallContext, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_router,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};

use roster_core::RecordStore;
use tokio::net::TcpListener;

use crate::tools::{
    self, CreateRecordParams, DeleteRecordParams, GetDataParams, GetRecordsParams,
    QueryDatabaseParams, UpdateRecordParams,
};

/// Path the streamable HTTP transport is mounted on.
pub const HTTP_PATH: &str = "/mcp";

/// Port the streamable HTTP transport listens on by default.
pub const DEFAULT_HTTP_PORT: u16 = 8001;

/// Error type for MCP server operations.
#[derive(Debug)]
pub enum ServerError {
    /// Listener could not be bound or failed while serving
    Io(std::io::Error),
    /// MCP protocol error
    Mcp(String),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(err)
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Io(err) => write!(f, "I/O error: {}", err),
            ServerError::Mcp(msg) => write!(f, "MCP error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

/// MCP server for the employee store.
///
/// Exposes the store's CRUD operations as MCP tools. Each call runs on the
/// blocking pool with its own store connection, so calls never wait on each
/// other inside the server.
#[derive(Clone)]
pub struct RosterMcpServer {
    store: RecordStore,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<RosterMcpServer>,
}

#[tool_router]
impl RosterMcpServer {
    /// Create a new MCP server backed by `store`.
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Create a new employee record in the employees table. \
        Provide first_name, last_name, location (Noida, Gurgaon, Bangalore, Hyderabad), \
        role (Manager, Associate, Supervisor, Assistant Manager), department (HR, IT, Finance, Marketing), \
        joined_date and dob as YYYY-MM-DD, and optionally supervisor_name. \
        Returns the new employee's ID as {\"eid\": <id>}.")]
    async fn create_record(
        &self,
        Parameters(params): Parameters<CreateRecordParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool: create_record, fields={}", params.payload().len());
        self.run_blocking(move |store| tools::create_record::execute(store, &params))
            .await
    }

    #[tool(description = "Get records from a table (default 'employees'). \
        Optionally filter with criteria (a column name, e.g. 'eid' or 'department') and value; \
        both must be given for the filter to apply. \
        Returns {\"columns\": [...], \"rows\": [...]}, with an empty row list if nothing matches.")]
    async fn get_records(
        &self,
        Parameters(params): Parameters<GetRecordsParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "Tool: get_records, table={}, criteria={:?}",
            params.table_name, params.criteria
        );
        self.run_blocking(move |store| tools::get_records::execute(store, &params))
            .await
    }

    #[tool(description = "Update a record by its ID (eid). \
        update_data maps column names to new values and must not be empty. \
        Returns {\"rows_affected\": n}; n is 0 when no record has that ID.")]
    async fn update_record(
        &self,
        Parameters(params): Parameters<UpdateRecordParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "Tool: update_record, table={}, record_id={}, fields={}",
            params.table_name,
            params.record_id,
            params.update_data.len()
        );
        self.run_blocking(move |store| tools::update_record::execute(store, &params))
            .await
    }

    #[tool(description = "Delete a record by its ID (eid). \
        Returns {\"rows_affected\": n}; n is 0 when no record has that ID.")]
    async fn delete_record(
        &self,
        Parameters(params): Parameters<DeleteRecordParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "Tool: delete_record, table={}, record_id={}",
            params.table_name, params.record_id
        );
        self.run_blocking(move |store| tools::delete_record::execute(store, &params))
            .await
    }

    #[tool(description = "Get data from a table, optionally filtered where the criteria column \
        equals value. Same output as get_records, with the value compared as text.")]
    async fn get_data(
        &self,
        Parameters(params): Parameters<GetDataParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(
            "Tool: get_data, table={}, criteria={:?}",
            params.table_name, params.criteria
        );
        self.run_blocking(move |store| tools::get_data::execute(store, &params))
            .await
    }

    #[tool(description = "Execute a custom SQL query and return its rows. \
        The query runs exactly as written. Prefer get_records for simple lookups. \
        The table argument is informational only.")]
    async fn query_database(
        &self,
        Parameters(params): Parameters<QueryDatabaseParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool: query_database, query={}", params.query);
        self.run_blocking(move |store| tools::query_database::execute(store, &params))
            .await
    }

    /// Tool descriptors, without needing a store.
    pub fn descriptors() -> Vec<Tool> {
        Self::tool_router().list_all()
    }

    /// All registered tool descriptors.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Whether a tool with this name is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tool_router
            .list_all()
            .iter()
            .any(|tool| tool.name == name)
    }

    /// Serve MCP over stdio (stdin/stdout).
    ///
    /// This method blocks until the connection is closed.
    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        debug!("Starting MCP server on stdio");
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| ServerError::Mcp(format!("Failed to start server: {}", e)))?;
        service
            .waiting()
            .await
            .map_err(|e| ServerError::Mcp(format!("Server error: {}", e)))?;
        Ok(())
    }

    /// Serve MCP over streamable HTTP on `addr`, under [`HTTP_PATH`].
    ///
    /// Each client session gets its own handle on the same store. Runs until
    /// interrupted with Ctrl-C.
    pub async fn serve_http(self, addr: SocketAddr) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_http_listener(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Serve MCP over streamable HTTP on a bound listener until `shutdown`
    /// completes.
    pub async fn serve_http_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let service = StreamableHttpService::new(
            move || Ok(self.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );
        let router = axum::Router::new().nest_service(HTTP_PATH, service);

        info!(
            "Serving MCP over HTTP at http://{}{}",
            listener.local_addr()?,
            HTTP_PATH
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Shutting down HTTP server");
            })
            .await?;
        Ok(())
    }

    /// Run a tool body on the blocking pool.
    ///
    /// A panicking call is reported to its caller as an internal error; the
    /// server keeps running.
    async fn run_blocking<F>(&self, call: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&RecordStore) -> CallToolResult + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || call(&store))
            .await
            .map_err(|e| {
                warn!("Tool call did not complete: {}", e);
                McpError::internal_error(format!("Tool call did not complete: {}", e), None)
            })
    }
}

/// The error returned for a tool name that is not registered.
pub fn unknown_tool(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!(
            "NotFoundError: tool '{}' is not registered. Use list_tools to see available tools.",
            name
        ),
        None,
    )
}

impl ServerHandler for RosterMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Roster MCP server. Use tools to create, read, update and delete employee records. \
                 Employees live in the 'employees' table keyed by 'eid'. \
                 Tool results are JSON; failed calls report an 'error' of ValidationError or StorageError."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.has_tool(&request.name) {
            warn!("Unknown tool requested: {}", request.name);
            return Err(unknown_tool(&request.name));
        }

        let context = ToolCallContext::new(self, request, context);
        self.tool_router.call(context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_error() {
        let error = unknown_tool("drop_everything");

        assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(error.message.contains("NotFoundError"));
        assert!(error.message.contains("drop_everything"));
    }

    #[test]
    fn test_server_error_display() {
        let error = ServerError::Mcp("connection closed".to_string());

        assert_eq!(error.to_string(), "MCP error: connection closed");
    }

    #[test]
    fn test_descriptors_without_store() {
        let names: Vec<_> = RosterMcpServer::descriptors()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        assert_eq!(names.len(), 6);
        assert!(names.contains(&"query_database".to_string()));
    }
}
