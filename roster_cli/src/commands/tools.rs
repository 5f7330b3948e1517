//! Tools command: prints the advertised tool descriptors.

use roster_mcp::RosterMcpServer;

use crate::errors::CliError;
use crate::ui;

/// Print every tool descriptor as pretty JSON on stdout.
pub fn print_tools() -> Result<(), CliError> {
    let tools = RosterMcpServer::descriptors();

    let json = serde_json::to_string_pretty(&tools).map_err(|e| {
        ui::error_with_details("Failed to serialize tools", &e.to_string());
        CliError::OutputError
    })?;

    println!("{}", json);
    Ok(())
}
