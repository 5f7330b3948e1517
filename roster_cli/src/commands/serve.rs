//! MCP server command implementation.

use std::net::SocketAddr;

use log::info;
use roster_core::StoreConfig;
use roster_mcp::RosterMcpServer;

use super::open_store;
use crate::cli::Transport;
use crate::errors::CliError;
use crate::ui;

/// Start the MCP server on the chosen transport.
pub fn serve(config: &StoreConfig, transport: Transport, addr: SocketAddr) -> Result<(), CliError> {
    let store = open_store(config)?;
    info!("Using store {}", config.redacted_url());
    if config.allow_list.is_restricted() {
        info!("Table allow-list is active");
    }

    // Create a tokio runtime for the async MCP server
    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        ui::error_with_details("Failed to create async runtime", &e.to_string());
        CliError::ServerError
    })?;

    rt.block_on(async {
        let server = RosterMcpServer::new(store);

        let served = match transport {
            // Serve over stdio (blocks until connection closes)
            Transport::Stdio => server.serve_stdio().await,
            Transport::Http => server.serve_http(addr).await,
        };

        served.map_err(|e| {
            ui::error_with_details("MCP server error", &e.to_string());
            CliError::ServerError
        })
    })
}
