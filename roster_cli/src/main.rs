mod cli;
mod commands;
mod errors;
mod ui;

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug};

use cli::{RosterCli, RosterCliCommand};

fn main() -> ExitCode {
    // Settings from .env must be in the environment before clap reads it
    let dotenv = dotenvy::dotenv();

    let cli = RosterCli::parse();
    initialize_logging(cli.verbose);

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    let config = cli.store.to_config();
    let result = match cli.command {
        RosterCliCommand::Serve {
            transport,
            port,
            bind,
        } => commands::serve(&config, transport, SocketAddr::new(bind, port)),
        RosterCliCommand::Check => commands::check(&config),
        RosterCliCommand::Tools => commands::print_tools(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}

fn initialize_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level).target(env_logger::Target::Stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.format_timestamp_secs();
    } else {
        builder.format_timestamp_millis();
    }

    builder.init();
}
