//! Tool metadata, discovery reports, and invocation request/result shapes.

use crate::{ServerId, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Description shown when a server advertises a tool without one.
pub const NO_DESCRIPTION: &str = "No description";

/// Metadata for one tool advertised by a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, unique within its server.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema describing the accepted arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Per-server result inside a [`DiscoveryReport`].
///
/// Serializes either as a plain tool array or as an `{"error": ...}` object,
/// so one failed server never hides the tools of the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerTools {
    /// The server responded with its tool list.
    Tools(Vec<Tool>),
    /// The server could not be reached or refused the listing.
    Error {
        /// Failure description.
        error: String,
    },
}

impl ServerTools {
    /// Returns the tool list, or `None` for a failed server.
    #[must_use]
    pub fn tools(&self) -> Option<&[Tool]> {
        match self {
            Self::Tools(tools) => Some(tools),
            Self::Error { .. } => None,
        }
    }

    /// Returns `true` when this server's listing failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Aggregated result of listing tools across every configured server.
///
/// # Examples
///
/// ```
/// use mcp_hub_core::{DiscoveryReport, ServerTools};
///
/// let mut report = DiscoveryReport::new(vec!["fetch".to_string()]);
/// report.record("fetch", true, ServerTools::Tools(vec![]));
/// assert_eq!(report.server_count, 1);
/// assert_eq!(report.total_tools, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Names of every configured server, connected or not.
    pub servers: Vec<String>,
    /// Per-server tool listings keyed by server name.
    pub tools: BTreeMap<String, ServerTools>,
    /// Total tools across servers that responded.
    pub total_tools: usize,
    /// Number of servers with a live connection.
    pub server_count: usize,
}

impl DiscoveryReport {
    /// Creates an empty report for the given configured servers.
    #[must_use]
    pub fn new(servers: Vec<String>) -> Self {
        Self {
            servers,
            tools: BTreeMap::new(),
            total_tools: 0,
            server_count: 0,
        }
    }

    /// Records one server's listing outcome, updating the counters.
    ///
    /// `connected` states whether the server's session is live; it drives
    /// `server_count` independently of whether the listing succeeded.
    pub fn record(&mut self, server: impl Into<String>, connected: bool, outcome: ServerTools) {
        if connected {
            self.server_count += 1;
        }
        if let ServerTools::Tools(tools) = &outcome {
            self.total_tools += tools.len();
        }
        self.tools.insert(server.into(), outcome);
    }

    /// Looks up the tool listing for one server.
    #[must_use]
    pub fn get(&self, server: &str) -> Option<&ServerTools> {
        self.tools.get(server)
    }
}

/// One tool invocation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Target server name.
    pub server: ServerId,
    /// Tool to invoke on that server.
    pub tool: ToolName,
    /// Arguments passed to the tool. Must be a JSON object when present.
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl ToolCallRequest {
    /// Creates a request with the given arguments.
    #[must_use]
    pub fn new(
        server: impl Into<ServerId>,
        tool: impl Into<ToolName>,
        arguments: Option<Value>,
    ) -> Self {
        Self {
            server: server.into(),
            tool: tool.into(),
            arguments,
        }
    }
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    /// The call completed; `result` holds the server's response.
    Success {
        /// Serialized tool response.
        result: Value,
    },
    /// The call failed before or during execution.
    Failure {
        /// Failure description.
        error: String,
    },
}

impl ToolOutcome {
    /// Returns `true` for a successful call.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Result of one tool invocation, paired with its addressing.
///
/// Results returned by a batch dispatch keep the order of their requests,
/// so the `server`/`tool` echo lets a caller correlate without indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Server the call was addressed to.
    pub server: ServerId,
    /// Tool that was invoked.
    pub tool: ToolName,
    /// Success or failure payload, flattened into the same object.
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    /// Builds a success result.
    #[must_use]
    pub fn success(server: ServerId, tool: ToolName, result: Value) -> Self {
        Self {
            server,
            tool,
            outcome: ToolOutcome::Success { result },
        }
    }

    /// Builds a failure result.
    #[must_use]
    pub fn failure(server: ServerId, tool: ToolName, error: impl Into<String>) -> Self {
        Self {
            server,
            tool,
            outcome: ToolOutcome::Failure {
                error: error.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_counters() {
        let mut report = DiscoveryReport::new(vec!["a".to_string(), "b".to_string()]);
        report.record(
            "a",
            true,
            ServerTools::Tools(vec![
                Tool {
                    name: "read".to_string(),
                    description: NO_DESCRIPTION.to_string(),
                    input_schema: json!({"type": "object"}),
                },
                Tool {
                    name: "write".to_string(),
                    description: "Write a file".to_string(),
                    input_schema: json!({"type": "object"}),
                },
            ]),
        );
        report.record(
            "b",
            false,
            ServerTools::Error {
                error: "spawn failed".to_string(),
            },
        );

        assert_eq!(report.total_tools, 2);
        assert_eq!(report.server_count, 1);
        assert!(report.get("b").unwrap().is_error());
    }

    #[test]
    fn test_connected_server_with_failed_listing_still_counted() {
        let mut report = DiscoveryReport::new(vec!["a".to_string()]);
        report.record(
            "a",
            true,
            ServerTools::Error {
                error: "listing refused".to_string(),
            },
        );

        assert_eq!(report.server_count, 1);
        assert_eq!(report.total_tools, 0);
        assert!(report.get("a").unwrap().is_error());
    }

    #[test]
    fn test_report_serialization_shape() {
        let mut report = DiscoveryReport::new(vec!["a".to_string()]);
        report.record(
            "a",
            true,
            ServerTools::Tools(vec![Tool {
                name: "read".to_string(),
                description: NO_DESCRIPTION.to_string(),
                input_schema: json!({"type": "object"}),
            }]),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["servers"], json!(["a"]));
        assert_eq!(value["tools"]["a"][0]["name"], json!("read"));
        assert_eq!(value["tools"]["a"][0]["inputSchema"]["type"], json!("object"));
        assert_eq!(value["total_tools"], json!(1));
        assert_eq!(value["server_count"], json!(1));
    }

    #[test]
    fn test_failed_server_serializes_as_error_object() {
        let mut report = DiscoveryReport::new(vec!["a".to_string()]);
        report.record(
            "a",
            false,
            ServerTools::Error {
                error: "connection refused".to_string(),
            },
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["tools"]["a"]["error"], json!("connection refused"));
    }

    #[test]
    fn test_result_flattens_outcome() {
        let ok = ToolCallResult::success("srv".into(), "echo".into(), json!({"text": "hi"}));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["server"], json!("srv"));
        assert_eq!(value["tool"], json!("echo"));
        assert_eq!(value["result"]["text"], json!("hi"));
        assert!(value.get("error").is_none());

        let bad = ToolCallResult::failure("srv".into(), "echo".into(), "timeout");
        let value = serde_json::to_value(&bad).unwrap();
        assert_eq!(value["error"], json!("timeout"));
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_request_roundtrip() {
        let parsed: ToolCallRequest = serde_json::from_str(
            r#"{"server": "fs", "tool": "read_file", "arguments": {"path": "/tmp/x"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.server.as_str(), "fs");
        assert_eq!(parsed.tool.as_str(), "read_file");
        assert_eq!(parsed.arguments, Some(json!({"path": "/tmp/x"})));

        let bare: ToolCallRequest =
            serde_json::from_str(r#"{"server": "fs", "tool": "list"}"#).unwrap();
        assert!(bare.arguments.is_none());
    }
}
