//! Launcher command resolution across platforms.
//!
//! Configurations commonly name a generic launcher (`npx`, `uvx`, `python`,
//! `node`) rather than a concrete executable. The resolver probes an ordered
//! list of candidate locations and replaces the alias with the first existing
//! executable path. Resolution is best-effort: when nothing is found the
//! original string is kept unchanged and the failure surfaces at connect
//! time instead.
//!
//! All probes are read-only filesystem existence checks.
//!
//! # Examples
//!
//! ```
//! use mcp_hub_core::CommandResolver;
//!
//! let resolver = CommandResolver::new();
//! // Unknown commands pass through untouched.
//! assert_eq!(resolver.resolve("definitely-not-installed"), "definitely-not-installed");
//! ```

use crate::ServerSpec;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Fallback alternatives tried when a launcher alias itself is not installed.
///
/// The alias is tried first, then each alternative in order.
const LAUNCHER_ALTERNATIVES: &[(&str, &[&str])] = &[
    ("uvx", &["uvx", "uv"]),
    ("npx", &["npx", "npm"]),
    ("python", &["python", "python3", "py"]),
    ("node", &["node", "nodejs"]),
];

/// Resolves launcher aliases to concrete executable paths.
///
/// Holds the search path explicitly so tests can probe a controlled
/// directory instead of the process environment.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    search_path: Option<OsString>,
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandResolver {
    /// Creates a resolver that probes the process `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    /// Creates a resolver with an explicit search path.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_hub_core::CommandResolver;
    ///
    /// let resolver = CommandResolver::with_search_path("/opt/tools/bin");
    /// ```
    #[must_use]
    pub fn with_search_path(path: impl AsRef<std::ffi::OsStr>) -> Self {
        Self {
            search_path: Some(path.as_ref().to_os_string()),
        }
    }

    /// Finds the full path to a command, or `None` if nothing exists.
    ///
    /// Probe order: the literal string as an existing file, each search-path
    /// directory, then platform-specific install locations.
    #[must_use]
    pub fn find_command(&self, command: &str) -> Option<PathBuf> {
        let literal = Path::new(command);
        if literal.is_file() {
            return Some(literal.to_path_buf());
        }

        if let Some(found) = self.find_in_search_path(command) {
            return Some(found);
        }

        platform_search_paths(command).into_iter().find(|p| p.is_file())
    }

    /// Resolves a command to a concrete path, trying known alternatives.
    ///
    /// Returns the original string when no candidate exists, so a resolution
    /// miss is deferred to connection time rather than failing the parse.
    #[must_use]
    pub fn resolve(&self, command: &str) -> String {
        if Path::new(command).is_file() {
            return command.to_string();
        }

        if let Some(found) = self.find_command(command) {
            return found.to_string_lossy().into_owned();
        }

        let base = command.to_lowercase();
        if let Some((_, alternatives)) =
            LAUNCHER_ALTERNATIVES.iter().find(|(alias, _)| *alias == base)
        {
            for alt in *alternatives {
                if let Some(found) = self.find_command(alt) {
                    tracing::debug!(command, resolved = %found.display(), "resolved launcher alias");
                    return found.to_string_lossy().into_owned();
                }
            }
        }

        tracing::debug!(command, "command not found, keeping original");
        command.to_string()
    }

    /// Returns a copy of the spec with its command resolved.
    #[must_use]
    pub fn normalize(&self, spec: &ServerSpec) -> ServerSpec {
        spec.with_command(self.resolve(spec.command()))
    }

    fn find_in_search_path(&self, command: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        for dir in env::split_paths(search_path) {
            for candidate in executable_names(command) {
                let path = dir.join(candidate);
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }
}

/// Candidate file names for a command on the current platform.
#[cfg(windows)]
fn executable_names(command: &str) -> Vec<String> {
    vec![
        format!("{command}.exe"),
        format!("{command}.cmd"),
        format!("{command}.bat"),
        command.to_string(),
    ]
}

#[cfg(not(windows))]
fn executable_names(command: &str) -> Vec<String> {
    vec![command.to_string()]
}

/// Platform-specific install directories probed after the search path.
#[cfg(windows)]
fn platform_search_paths(command: &str) -> Vec<PathBuf> {
    let Some(home) = dirs_home() else {
        return Vec::new();
    };
    vec![
        home.join(format!(
            "AppData/Local/Programs/Python/Python313/Scripts/{command}.exe"
        )),
        home.join(format!("AppData/Roaming/npm/{command}.cmd")),
        PathBuf::from(format!("C:/Program Files/nodejs/{command}.cmd")),
    ]
}

#[cfg(not(windows))]
fn platform_search_paths(_command: &str) -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(windows)]
fn dirs_home() -> Option<PathBuf> {
    env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        path
    }

    #[test]
    fn test_literal_path_wins() {
        let temp = tempfile::tempdir().unwrap();
        let binary = make_executable(temp.path(), "my-server");

        let resolver = CommandResolver::with_search_path("");
        let resolved = resolver.resolve(binary.to_str().unwrap());
        assert_eq!(resolved, binary.to_str().unwrap());
    }

    #[test]
    fn test_search_path_probe() {
        let temp = tempfile::tempdir().unwrap();
        make_executable(temp.path(), "uvx");

        let resolver = CommandResolver::with_search_path(temp.path());
        let resolved = resolver.resolve("uvx");
        assert!(resolved.ends_with("uvx"));
        assert!(Path::new(&resolved).is_file());
    }

    #[test]
    fn test_alias_falls_back_to_alternative() {
        let temp = tempfile::tempdir().unwrap();
        // Only `uv` is installed; `uvx` should fall back to it.
        let uv = make_executable(temp.path(), "uv");

        let resolver = CommandResolver::with_search_path(temp.path());
        let resolved = resolver.resolve("uvx");
        assert_eq!(resolved, uv.to_str().unwrap());
    }

    #[test]
    fn test_alias_case_insensitive() {
        let temp = tempfile::tempdir().unwrap();
        let npm = make_executable(temp.path(), "npm");

        let resolver = CommandResolver::with_search_path(temp.path());
        assert_eq!(resolver.resolve("NPX"), npm.to_str().unwrap());
    }

    #[test]
    fn test_unresolved_keeps_original() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = CommandResolver::with_search_path(temp.path());

        assert_eq!(resolver.resolve("npx"), "npx");
        assert_eq!(resolver.resolve("unknown-tool"), "unknown-tool");
    }

    #[test]
    fn test_normalize_spec() {
        let temp = tempfile::tempdir().unwrap();
        let node = make_executable(temp.path(), "node");

        let spec = ServerSpec::builder("local")
            .command("node")
            .arg("server.js")
            .build();

        let resolver = CommandResolver::with_search_path(temp.path());
        let normalized = resolver.normalize(&spec);
        assert_eq!(normalized.command(), node.to_str().unwrap());
        assert_eq!(normalized.args(), spec.args());
    }

    #[test]
    fn test_find_command_missing() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = CommandResolver::with_search_path(temp.path());
        assert!(resolver.find_command("ghost").is_none());
    }
}
