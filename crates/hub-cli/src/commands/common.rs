//! Shared helpers for command implementations.

use anyhow::{Context, Result, bail};
use mcp_hub_core::{CommandResolver, HubConfig};
use mcp_hub_pool::{PoolConfig, SessionPool};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration location: `~/.mcp-hub/mcp.json`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mcp-hub").join("mcp.json"))
}

/// Loads and parses the hub configuration.
///
/// Uses `path` when given, otherwise falls back to the default location.
/// Launcher aliases are resolved unless `no_resolve` is set.
///
/// # Errors
///
/// Fails when no config path can be determined, the file cannot be read,
/// or the document does not parse.
pub async fn load_config(path: Option<&Path>, no_resolve: bool) -> Result<HubConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(default) = default_config_path() else {
                bail!("cannot determine home directory; pass --config");
            };
            default
        }
    };

    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config = HubConfig::from_json_with(&text, &CommandResolver::new(), !no_resolve)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;

    for warning in config.validate() {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

/// Builds a session pool from the CLI timeout flags.
///
/// # Errors
///
/// Fails when either timeout is zero.
pub fn build_pool(connect_timeout_secs: u64, call_timeout_secs: u64) -> Result<SessionPool> {
    let config = PoolConfig::new()
        .with_connect_timeout(Duration::from_secs(connect_timeout_secs))
        .with_call_timeout(Duration::from_secs(call_timeout_secs));
    config.validate()?;
    Ok(SessionPool::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mcpServers":{{"echo":{{"command":"my-echo-server"}}}}}}"#
        )
        .unwrap();

        let config = load_config(Some(file.path()), true).await.unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(
            config.get(&"echo".into()).unwrap().command(),
            "my-echo-server"
        );
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/mcp.json")), true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[tokio::test]
    async fn test_load_config_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{broken").unwrap();

        let err = load_config(Some(file.path()), true).await.unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn test_build_pool_rejects_zero_timeout() {
        assert!(build_pool(0, 60).is_err());
        assert!(build_pool(30, 0).is_err());
        assert!(build_pool(30, 60).is_ok());
    }
}
