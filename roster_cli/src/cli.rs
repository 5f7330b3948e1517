use std::net::IpAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use roster_core::{StoreConfig, TableAllowList};
use roster_mcp::DEFAULT_HTTP_PORT;

/// Defines the top-level interface for the Roster CLI with clap.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about = "Roster CLI: Serve employee records to AI agents over MCP.")]
pub struct RosterCli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Enable verbose output?
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: RosterCliCommand,
}

/// Store connection settings, read from flags or the environment.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// Store engine kind (sqlite or postgresql)
    #[arg(long, env = "db_engine", global = true)]
    pub db_engine: Option<String>,

    /// Store username
    #[arg(long, env = "db_username", global = true)]
    pub db_username: Option<String>,

    /// Store password
    #[arg(long, env = "db_password", global = true, hide_env_values = true)]
    pub db_password: Option<String>,

    /// Store host
    #[arg(long = "db-host", env = "rds_endpoint", global = true)]
    pub db_host: Option<String>,

    /// Store port
    #[arg(long, env = "db_port", global = true)]
    pub db_port: Option<u16>,

    /// Database name (for sqlite, the database file path)
    #[arg(long, env = "db_name", global = true)]
    pub db_name: Option<String>,

    /// Comma-separated tables permitted for table-name parameters
    #[arg(long, env = "WHITELIST", global = true)]
    pub whitelist: Option<String>,

    /// Milliseconds to wait on a locked database before failing a call
    #[arg(long, env = "ROSTER_BUSY_TIMEOUT_MS", global = true, default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl StoreArgs {
    /// Converts the arguments into store settings.
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            engine: self.db_engine.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            allow_list: self
                .whitelist
                .as_deref()
                .map(TableAllowList::parse)
                .unwrap_or_default(),
        }
    }
}

/// Transport the MCP server is served over.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum Transport {
    /// stdin/stdout, for clients that spawn the server
    Stdio,
    /// Streamable HTTP on a network port
    Http,
}

/// Defines the available subcommands of the Roster CLI.
#[derive(Subcommand, Debug, PartialEq)]
pub enum RosterCliCommand {
    /// Serve the employee tools over MCP.
    Serve {
        /// Transport to serve over
        #[arg(short, long, value_enum, default_value_t = Transport::Http)]
        transport: Transport,
        /// Port for the HTTP transport
        #[arg(short, long, env = "ROSTER_PORT", default_value_t = DEFAULT_HTTP_PORT)]
        port: u16,
        /// Address for the HTTP transport to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
    },
    /// Check that the store is reachable and the employees table exists.
    Check,
    /// Print the registered tool descriptors as JSON.
    Tools,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = RosterCli::try_parse_from(["roster", "serve"]).unwrap();

        assert_eq!(
            cli.command,
            RosterCliCommand::Serve {
                transport: Transport::Http,
                port: 8001,
                bind: "127.0.0.1".parse().unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_store_flags() {
        let cli = RosterCli::try_parse_from([
            "roster",
            "check",
            "--db-engine",
            "sqlite",
            "--db-name",
            "hr.db",
            "--whitelist",
            "employees",
            "--busy-timeout-ms",
            "250",
        ])
        .unwrap();

        let config = cli.store.to_config();

        assert_eq!(config.engine.as_deref(), Some("sqlite"));
        assert_eq!(config.database.as_deref(), Some("hr.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(config.allow_list.permits("employees"));
        assert!(!config.allow_list.permits("salaries"));
    }

    #[test]
    fn test_parse_stdio_transport() {
        let cli = RosterCli::try_parse_from(["roster", "serve", "--transport", "stdio"]).unwrap();

        assert!(matches!(
            cli.command,
            RosterCliCommand::Serve {
                transport: Transport::Stdio,
                ..
            }
        ));
    }
}
