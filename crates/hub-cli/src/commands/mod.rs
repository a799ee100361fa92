//! Command implementations for the MCP Hub CLI.
//!
//! Each command module parses its inputs, runs the operation against the
//! session pool, and formats output according to the requested format.

pub mod batch;
pub mod call;
pub mod common;
pub mod completions;
pub mod resolve;
pub mod tools;
