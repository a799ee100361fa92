//! Parsing and normalization of the `mcpServers` JSON configuration.
//!
//! The input document has the shape:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "playwright": {
//!       "command": "npx",
//!       "args": ["@playwright/mcp@latest"],
//!       "env": {"DEBUG": "1"}
//!     }
//!   }
//! }
//! ```
//!
//! Parsing validates required fields, optionally resolves launcher aliases,
//! and produces a [`HubConfig`] whose [`Fingerprint`] serves as the
//! session-cache key. The fingerprint is a pure function of the normalized
//! `(name, command, args, env)` tuples: servers are kept in a sorted map and
//! env keys are sorted, so two semantically identical documents that differ
//! in key order or whitespace hash identically.

use crate::{CommandResolver, Error, Result, ServerId, ServerSpec};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Deterministic digest of a normalized configuration (blake3, hex).
///
/// Used as the key of the session cache: one live session set exists per
/// distinct fingerprint.
///
/// # Examples
///
/// ```
/// use mcp_hub_core::HubConfig;
///
/// let a = HubConfig::from_json(r#"{"mcpServers":{"x":{"command":"npx"}}}"#).unwrap();
/// let b = HubConfig::from_json(r#"{ "mcpServers" : { "x" : { "command" : "npx" } } }"#).unwrap();
/// assert_eq!(a.fingerprint(), b.fingerprint());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the hex digest as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw shape of one `mcpServers` entry, before validation.
#[derive(Debug, Deserialize)]
struct RawServerEntry {
    command: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    cwd: Option<std::path::PathBuf>,
}

/// A normalized set of server specifications.
///
/// Servers are held in a `BTreeMap` keyed by [`ServerId`], which fixes the
/// iteration order and makes fingerprinting order-independent with respect
/// to the input document.
///
/// # Examples
///
/// ```
/// use mcp_hub_core::HubConfig;
///
/// let config = HubConfig::from_json(r#"{
///   "mcpServers": {
///     "fetch": {"command": "uvx", "args": ["mcp-server-fetch"]}
///   }
/// }"#).unwrap();
///
/// assert_eq!(config.len(), 1);
/// assert!(config.get(&"fetch".into()).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    servers: BTreeMap<ServerId, ServerSpec>,
}

impl HubConfig {
    /// Parses a configuration document, resolving launcher aliases.
    ///
    /// Equivalent to [`from_json_with`](Self::from_json_with) with a default
    /// resolver and `auto_resolve` enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the text is not valid JSON, the
    /// `mcpServers` key is absent or not an object, an entry is missing its
    /// `command`, or a server name is empty.
    pub fn from_json(config_json: &str) -> Result<Self> {
        Self::from_json_with(config_json, &CommandResolver::new(), true)
    }

    /// Parses a configuration document with explicit resolution control.
    ///
    /// With `auto_resolve` disabled, command strings are kept exactly as
    /// written.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_json`](Self::from_json).
    pub fn from_json_with(
        config_json: &str,
        resolver: &CommandResolver,
        auto_resolve: bool,
    ) -> Result<Self> {
        let document: Value =
            serde_json::from_str(config_json).map_err(|e| Error::ConfigError {
                message: format!("invalid JSON: {e}"),
            })?;

        let entries = document
            .get("mcpServers")
            .ok_or_else(|| Error::ConfigError {
                message: "configuration must contain 'mcpServers' key".to_string(),
            })?
            .as_object()
            .ok_or_else(|| Error::ConfigError {
                message: "'mcpServers' must be an object".to_string(),
            })?;

        let mut servers = BTreeMap::new();
        for (name, entry) in entries {
            if name.is_empty() {
                return Err(Error::ConfigError {
                    message: "server name cannot be empty".to_string(),
                });
            }

            let raw: RawServerEntry =
                serde_json::from_value(entry.clone()).map_err(|e| Error::ConfigError {
                    message: format!("server '{name}' has invalid shape: {e}"),
                })?;

            let command = raw.command.ok_or_else(|| Error::ConfigError {
                message: format!("server '{name}' missing required 'command' field"),
            })?;

            let mut builder = ServerSpec::builder(name.as_str())
                .command(command)
                .args(raw.args)
                .environment(raw.env);
            if let Some(cwd) = raw.cwd {
                builder = builder.cwd(cwd);
            }
            let mut spec = builder.try_build()?;

            if auto_resolve {
                spec = resolver.normalize(&spec);
            }

            servers.insert(spec.name().clone(), spec);
        }

        Ok(Self { servers })
    }

    /// Builds a configuration directly from specs (mainly for tests and
    /// programmatic use).
    #[must_use]
    pub fn from_specs(specs: impl IntoIterator<Item = ServerSpec>) -> Self {
        let servers = specs
            .into_iter()
            .map(|spec| (spec.name().clone(), spec))
            .collect();
        Self { servers }
    }

    /// Returns the number of configured servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns `true` when no servers are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Looks up one server spec by name.
    #[must_use]
    pub fn get(&self, name: &ServerId) -> Option<&ServerSpec> {
        self.servers.get(name)
    }

    /// Iterates over servers in sorted name order.
    pub fn servers(&self) -> impl Iterator<Item = (&ServerId, &ServerSpec)> {
        self.servers.iter()
    }

    /// Returns the sorted list of server names.
    #[must_use]
    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().map(|id| id.as_str().to_string()).collect()
    }

    /// Computes the configuration fingerprint.
    ///
    /// The digest covers every `(name, command, args, env)` tuple in sorted
    /// server order with sorted env keys; input formatting never affects the
    /// result. Every field is length-prefixed before hashing, so bytes can
    /// never shift across field boundaries: `["ab"]` and `["a", "b"]` hash
    /// differently, and so do fields that contain separator-like bytes.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        fn feed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }

        let mut hasher = blake3::Hasher::new();
        for (name, spec) in &self.servers {
            feed(&mut hasher, name.as_str().as_bytes());
            feed(&mut hasher, spec.command().as_bytes());
            hasher.update(&(spec.args().len() as u64).to_le_bytes());
            for arg in spec.args() {
                feed(&mut hasher, arg.as_bytes());
            }
            hasher.update(&(spec.env().len() as u64).to_le_bytes());
            for (key, value) in spec.env() {
                feed(&mut hasher, key.as_bytes());
                feed(&mut hasher, value.as_bytes());
            }
        }
        Fingerprint(hasher.finalize().to_hex().to_string())
    }

    /// Validates the configuration, returning non-fatal warnings.
    ///
    /// An empty warning list means no issues. Unlike parse errors these do
    /// not stop an operation: a config with warnings may still connect.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.servers.is_empty() {
            issues.push("no servers configured".to_string());
            return issues;
        }

        for (name, spec) in &self.servers {
            if spec.command().trim().is_empty() {
                issues.push(format!("server '{name}' has empty command"));
            }
        }

        issues
    }
}
