//! Output formatters for CLI commands.
//!
//! Every command serializes its result once and hands it here, so the three
//! output modes stay consistent across the whole CLI.

use anyhow::Result;
use colored::Colorize;
use mcp_hub_core::cli::OutputFormat;
use serde::Serialize;

/// Formats data according to the selected output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use mcp_hub_cli::formatters::format_output;
/// use mcp_hub_core::cli::OutputFormat;
/// use serde_json::json;
///
/// let output = format_output(&json!({"servers": ["fetch"]}), OutputFormat::Json)?;
/// assert!(output.contains("\"servers\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => Ok(serde_json::to_string(data)?),
        OutputFormat::Pretty => {
            let value = serde_json::to_value(data)?;
            let mut out = String::new();
            render_pretty(&value, 0, &mut out);
            Ok(out)
        }
    }
}

/// Renders a value as indented `key: value` lines with colored keys.
fn render_pretty(value: &serde_json::Value, indent: usize, out: &mut String) {
    use serde_json::Value;

    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}\n"),
        Value::Object(map) => {
            for (key, val) in map {
                out.push_str(&pad);
                out.push_str(&format!("{}:", key.blue().bold()));
                if is_scalar(val) {
                    out.push(' ');
                    out.push_str(&render_scalar(val));
                    out.push('\n');
                } else {
                    out.push('\n');
                    render_pretty(val, indent + 1, out);
                }
            }
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]\n"),
        Value::Array(items) => {
            for item in items {
                if is_scalar(item) {
                    out.push_str(&pad);
                    out.push_str("- ");
                    out.push_str(&render_scalar(item));
                    out.push('\n');
                } else {
                    out.push_str(&pad);
                    out.push_str("-\n");
                    render_pretty(item, indent + 1, out);
                }
            }
        }
        scalar => {
            out.push_str(&pad);
            out.push_str(&render_scalar(scalar));
            out.push('\n');
        }
    }
}

const fn is_scalar(value: &serde_json::Value) -> bool {
    !matches!(
        value,
        serde_json::Value::Object(_) | serde_json::Value::Array(_)
    )
}

fn render_scalar(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Bool(b) => b.to_string().yellow().to_string(),
        Value::Number(n) => n.to_string().cyan().to_string(),
        Value::String(s) => s.green().to_string(),
        Value::Array(_) | Value::Object(_) => unreachable!("scalar renderers only"),
    }
}
