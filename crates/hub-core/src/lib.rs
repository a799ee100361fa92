//! Core types, configuration handling, and errors for MCP Hub.
//!
//! This crate provides the foundational types shared by the session pool and
//! the CLI:
//!
//! - Strong domain types (`ServerId`, `ToolName`, `SessionId`)
//! - Error hierarchy with contextual information
//! - Server specifications and the `mcpServers` JSON configuration parser
//! - Launcher alias resolution (`npx`/`uvx`-style commands to concrete paths)
//! - Configuration fingerprinting for session-cache keys

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod resolver;
mod server_spec;
mod tool;
mod types;

pub mod cli;

pub use config::{Fingerprint, HubConfig};
pub use error::{Error, Result};
pub use resolver::CommandResolver;
pub use server_spec::{ServerSpec, ServerSpecBuilder};
pub use tool::{
    DiscoveryReport, NO_DESCRIPTION, ServerTools, Tool, ToolCallRequest, ToolCallResult,
    ToolOutcome,
};
pub use types::{ServerId, SessionId, ToolName};
