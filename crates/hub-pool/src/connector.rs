//! Transport abstraction between the pool and live MCP servers.
//!
//! The pool only ever talks to servers through the [`Connector`] and
//! [`ToolChannel`] traits. Production code uses [`StdioConnector`], which
//! spawns the server as a child process and speaks MCP over its stdio via
//! the `rmcp` SDK. Tests substitute in-memory implementations.

use async_trait::async_trait;
use mcp_hub_core::{Error, NO_DESCRIPTION, Result, ServerSpec, Tool};
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::Value;
use std::time::Duration;

/// An open channel to one MCP server.
///
/// Dropping a channel releases the underlying transport; for stdio this
/// terminates the child process.
#[async_trait]
pub trait ToolChannel: Send + Sync {
    /// Lists every tool the server advertises.
    async fn list_tools(&self) -> Result<Vec<Tool>>;

    /// Invokes one tool, returning the server's response as JSON.
    ///
    /// `arguments` must be a JSON object when present.
    async fn call_tool(&self, tool: &str, arguments: Option<Value>) -> Result<Value>;
}

impl std::fmt::Debug for dyn ToolChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ToolChannel")
    }
}

/// Factory for [`ToolChannel`]s.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes a channel to the server described by `spec`.
    async fn connect(&self, spec: &ServerSpec) -> Result<Box<dyn ToolChannel>>;
}

/// Connector that spawns servers as child processes over stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioConnector;

impl StdioConnector {
    /// Creates a stdio connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for StdioConnector {
    async fn connect(&self, spec: &ServerSpec) -> Result<Box<dyn ToolChannel>> {
        let server = spec.name().to_string();
        tracing::info!(server = %server, command = spec.command(), "connecting to MCP server");

        let transport = TokioChildProcess::new(
            tokio::process::Command::new(spec.command()).configure(|cmd| {
                cmd.args(spec.args());
                for (key, value) in spec.env() {
                    cmd.env(key, value);
                }
                if let Some(cwd) = spec.cwd() {
                    cmd.current_dir(cwd);
                }
            }),
        )
        .map_err(|e| Error::ConnectionFailed {
            server: server.clone(),
            source: Box::new(e),
        })?;

        let client = ().serve(transport).await.map_err(|e| Error::ConnectionFailed {
            server: server.clone(),
            source: Box::new(e),
        })?;

        tracing::info!(server = %server, "connected");
        Ok(Box::new(RmcpChannel { client, server }))
    }
}

/// Production channel backed by an `rmcp` client session.
struct RmcpChannel {
    client: rmcp::service::RunningService<RoleClient, ()>,
    server: String,
}

#[async_trait]
impl ToolChannel for RmcpChannel {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        let tools = self
            .client
            .list_all_tools()
            .await
            .map_err(|e| Error::ToolCallFailed {
                server: self.server.clone(),
                tool: "tools/list".to_string(),
                message: e.to_string(),
            })?;

        Ok(tools
            .into_iter()
            .map(|t| Tool {
                name: t.name.to_string(),
                description: t
                    .description
                    .map_or_else(|| NO_DESCRIPTION.to_string(), |d| d.to_string()),
                input_schema: Value::Object((*t.input_schema).clone()),
            })
            .collect())
    }

    async fn call_tool(&self, tool: &str, arguments: Option<Value>) -> Result<Value> {
        let arguments = match arguments {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(Error::InvalidArgument(format!(
                    "tool arguments must be a JSON object, got {}",
                    value_kind(&other)
                )));
            }
        };

        let tool_result = self
            .client
            .call_tool(rmcp::model::CallToolRequestParam {
                name: std::borrow::Cow::Owned(tool.to_owned()),
                arguments,
            })
            .await
            .map_err(|e| Error::ToolCallFailed {
                server: self.server.clone(),
                tool: tool.to_string(),
                message: e.to_string(),
            })?;

        serde_json::to_value(&tool_result).map_err(|e| Error::SerializationError {
            message: "failed to serialize tool result".to_string(),
            source: Some(e),
        })
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Runs a connect attempt under a deadline.
///
/// A slow-spawning server that exceeds `timeout` yields [`Error::Timeout`]
/// rather than hanging the whole acquire.
pub(crate) async fn connect_with_timeout(
    connector: &dyn Connector,
    spec: &ServerSpec,
    timeout: Duration,
) -> Result<Box<dyn ToolChannel>> {
    match tokio::time::timeout(timeout, connector.connect(spec)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            operation: format!("connect to '{}'", spec.name()),
            duration_secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_hub_core::ServerSpec;

    struct SlowConnector;

    #[async_trait]
    impl Connector for SlowConnector {
        async fn connect(&self, _spec: &ServerSpec) -> Result<Box<dyn ToolChannel>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_timeout() {
        let spec = ServerSpec::builder("slow").command("sleepy").build();
        let err = connect_with_timeout(&SlowConnector, &spec, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(format!("{err}").contains("slow"));
    }

    #[tokio::test]
    async fn test_stdio_connect_spawn_failure() {
        let spec = ServerSpec::builder("ghost")
            .command("/nonexistent/mcp-server-binary")
            .build();
        let err = StdioConnector::new().connect(&spec).await.unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(value_kind(&Value::Null), "null");
        assert_eq!(value_kind(&serde_json::json!([1])), "an array");
        assert_eq!(value_kind(&serde_json::json!("x")), "a string");
    }
}
