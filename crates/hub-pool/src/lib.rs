//! Session pooling, tool discovery, and parallel dispatch for MCP servers.
//!
//! This crate turns a parsed configuration into live server sessions and
//! runs tool operations against them:
//!
//! - [`SessionPool`] caches one [`SessionSet`] per configuration
//!   fingerprint, spawning servers over stdio via the official rmcp SDK
//! - [`discover`] lists the tools of every server concurrently
//! - [`invoke_all`] fans a batch of tool calls out in parallel, returning
//!   results in request order
//!
//! # Examples
//!
//! ```no_run
//! use mcp_hub_core::{HubConfig, ToolCallRequest};
//! use mcp_hub_pool::{SessionPool, discover, invoke_all};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HubConfig::from_json(r#"{
//!     "mcpServers": {"fetch": {"command": "uvx", "args": ["mcp-server-fetch"]}}
//! }"#)?;
//!
//! let pool = SessionPool::with_defaults();
//! let sessions = pool.acquire(&config).await;
//!
//! let report = discover(&sessions, pool.config().call_timeout()).await;
//! println!("{} tools available", report.total_tools);
//!
//! let results = invoke_all(
//!     &sessions,
//!     vec![ToolCallRequest::new("fetch", "fetch", Some(json!({"url": "https://example.com"})))],
//!     pool.config().call_timeout(),
//! )
//! .await;
//! println!("{:?}", results[0]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod connector;
mod discovery;
mod dispatch;
mod pool;
mod session;

pub use connector::{Connector, StdioConnector, ToolChannel};
pub use discovery::discover;
pub use dispatch::{invoke_all, invoke_one};
pub use pool::{PoolConfig, PoolStats, SessionPool};
pub use session::{Session, SessionSet, SessionState};
