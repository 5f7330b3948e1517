//! MCP server for Roster.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! CRUD operations on the employee store to AI agents as tools.

mod server;
pub mod tools;

pub use server::{DEFAULT_HTTP_PORT, HTTP_PATH, RosterMcpServer, ServerError, unknown_tool};
