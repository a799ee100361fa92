//! Error types for MCP Hub.
//!
//! A single error hierarchy is shared across the workspace. Configuration
//! problems are fatal to the operation that raised them; per-server and
//! per-tool-call failures are captured as data inside result structures
//! instead, so a multi-server operation degrades gracefully.
//!
//! # Examples
//!
//! ```
//! use mcp_hub_core::{Error, Result};
//!
//! fn check_name(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "server name cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_name("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for MCP Hub.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete input configuration.
    ///
    /// Raised when the `mcpServers` JSON document is invalid, a server entry
    /// is missing its `command`, or a server name is empty. Surfaced
    /// immediately to the caller; never retried.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// A specific server failed to start or respond during connect.
    ///
    /// Recorded per server inside the session set; one server failing never
    /// aborts sibling connection attempts.
    #[error("MCP server connection failed: {server}")]
    ConnectionFailed {
        /// Name of the server that failed to connect
        server: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A specific tool invocation failed.
    ///
    /// Captured as an error result for that request only; sibling requests
    /// in the same batch are unaffected.
    #[error("Tool call failed: {server}::{tool}: {message}")]
    ToolCallFailed {
        /// Server the call was routed to
        server: String,
        /// Tool that was invoked
        tool: String,
        /// Description of the failure
        message: String,
    },

    /// Resource (server, tool, config file) not found.
    #[error("Resource not found: {resource}")]
    ResourceNotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// An operation exceeded its configured timeout.
    #[error("Operation timed out after {duration_secs}s: {operation}")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
        /// Duration in seconds before timeout occurred
        duration_secs: u64,
    },

    /// JSON conversion failed.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    /// Returns `true` if this is a tool call error.
    #[must_use]
    pub const fn is_tool_call_error(&self) -> bool {
        matches!(self, Self::ToolCallFailed { .. })
    }

    /// Returns `true` if this is a resource not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for MCP Hub operations.
pub type Result<T> = std::result::Result<T, Error>;
