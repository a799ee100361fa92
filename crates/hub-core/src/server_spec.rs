//! Server specification: command, arguments, and environment for one server.
//!
//! A [`ServerSpec`] describes how to launch one MCP server as a subprocess.
//! Argument order is significant and preserved exactly as configured; the
//! environment map uses a `BTreeMap` so the spec always serializes in a
//! stable key order, which keeps configuration fingerprints deterministic.
//!
//! # Examples
//!
//! ```
//! use mcp_hub_core::ServerSpec;
//!
//! let spec = ServerSpec::builder("playwright")
//!     .command("npx")
//!     .arg("@playwright/mcp@latest")
//!     .build();
//!
//! assert_eq!(spec.command(), "npx");
//! assert_eq!(spec.args().len(), 1);
//! ```

use crate::{Error, Result, ServerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for launching one MCP server subprocess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSpec {
    /// Unique server name within a configuration.
    pub name: ServerId,

    /// Command to execute (binary name, launcher alias, or path).
    ///
    /// Launcher aliases such as `npx` or `uvx` may be replaced by a concrete
    /// executable path during normalization; resolution is best-effort and
    /// the original string survives when no candidate is found.
    pub command: String,

    /// Arguments passed to the command, in configured order.
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variables set for the subprocess.
    ///
    /// Added on top of the parent process environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working directory for the subprocess (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl ServerSpec {
    /// Creates a new builder for a server with the given name.
    #[must_use]
    pub fn builder(name: impl Into<ServerId>) -> ServerSpecBuilder {
        ServerSpecBuilder {
            name: name.into(),
            command: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Returns the server name.
    #[must_use]
    pub const fn name(&self) -> &ServerId {
        &self.name
    }

    /// Returns the command string.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the argument list.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the environment variable map.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub const fn cwd(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// Returns a copy of this spec with the command replaced.
    #[must_use]
    pub fn with_command(&self, command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..self.clone()
        }
    }
}

/// Builder for [`ServerSpec`] instances.
///
/// # Examples
///
/// ```
/// use mcp_hub_core::ServerSpec;
///
/// let spec = ServerSpec::builder("fetch")
///     .command("uvx")
///     .arg("mcp-server-fetch")
///     .env("HTTP_PROXY", "http://localhost:3128")
///     .build();
///
/// assert_eq!(spec.env().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ServerSpecBuilder {
    name: ServerId,
    command: Option<String>,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ServerSpecBuilder {
    /// Sets the command to execute.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets all arguments at once, replacing any previously added.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Adds a single environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets all environment variables at once, replacing any previously added.
    #[must_use]
    pub fn environment(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Sets the working directory for the subprocess.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Builds the `ServerSpec`.
    ///
    /// # Panics
    ///
    /// Panics if the command was not set or validation fails.
    /// Use [`try_build`](Self::try_build) for fallible construction.
    #[must_use]
    pub fn build(self) -> ServerSpec {
        self.try_build().expect("ServerSpec::build() failed validation")
    }

    /// Attempts to build the `ServerSpec`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the server name is empty, the
    /// command is missing, or the command is empty.
    pub fn try_build(self) -> Result<ServerSpec> {
        if self.name.as_str().is_empty() {
            return Err(Error::ConfigError {
                message: "server name cannot be empty".to_string(),
            });
        }

        let command = self.command.ok_or_else(|| Error::ConfigError {
            message: format!("server '{}' missing required 'command' field", self.name),
        })?;

        if command.trim().is_empty() {
            return Err(Error::ConfigError {
                message: format!("server '{}' has empty command", self.name),
            });
        }

        Ok(ServerSpec {
            name: self.name,
            command,
            args: self.args,
            env: self.env,
            cwd: self.cwd,
        })
    }
}
