//! Output formatting for tool results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::str::FromStr;

use anyhow::Result;
use colored::*;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// Render a tool result for the terminal.
pub fn render(tool: &str, result: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Pretty => Ok(render_pretty(tool, result)),
    }
}

fn render_pretty(tool: &str, result: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", tool.bold().cyan()));

    let Some(object) = result.as_object() else {
        out.push_str(&result.to_string());
        return out;
    };

    for (key, value) in object {
        match value {
            Value::Array(items) => {
                out.push_str(&format!("  {} ({})\n", key.bold(), items.len()));
                for item in items {
                    out.push_str(&render_item(item));
                }
            }
            Value::Object(_) => {
                out.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
            Value::String(s) if s.contains('\n') => {
                out.push_str(&format!("  {}:\n", key.bold()));
                for line in s.lines() {
                    out.push_str(&format!("    {}\n", line));
                }
            }
            other => {
                out.push_str(&format!("  {}: {}\n", key.bold(), other));
            }
        }
    }
    out
}

fn render_item(item: &Value) -> String {
    let Some(object) = item.as_object() else {
        return format!("    - {}\n", item);
    };

    let headline = object
        .get("description")
        .or_else(|| object.get("reason"))
        .or_else(|| object.get("finding"))
        .or_else(|| object.get("symbol_name"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let location = object
        .get("location")
        .and_then(|v| v.as_str())
        .map(|l| format!(" [{}]", l.dimmed()))
        .unwrap_or_default();
    let badge = object
        .get("severity")
        .or_else(|| object.get("priority"))
        .and_then(|v| v.as_str())
        .map(colorize_level)
        .map(|b| format!("{} ", b))
        .unwrap_or_default();

    format!("    - {}{}{}\n", badge, headline, location)
}

fn colorize_level(level: &str) -> String {
    match level {
        "critical" => level.red().bold().to_string(),
        "high" => level.red().to_string(),
        "medium" => level.yellow().to_string(),
        _ => level.normal().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_str() {
        assert_eq!("pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_render_round_trips() {
        let result = json!({"total_found": 2, "issues": []});
        let rendered = render("security_audit", &result, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_pretty_render_lists_items() {
        colored::control::set_override(false);
        let result = json!({
            "total_found": 1,
            "issues": [{
                "severity": "critical",
                "description": "SQL query built from an f-string",
                "location": "app.py:3",
            }],
        });
        let rendered = render("security_audit", &result, OutputFormat::Pretty).unwrap();
        assert!(rendered.contains("security_audit"));
        assert!(rendered.contains("issues (1)"));
        assert!(rendered.contains("SQL query built from an f-string"));
        assert!(rendered.contains("app.py:3"));
        colored::control::unset_override();
    }

    #[test]
    fn test_pretty_render_multiline_strings_are_indented() {
        colored::control::set_override(false);
        let result = json!({"test_code": "def test_x():\n    assert True\n"});
        let rendered = render("tests_generate", &result, OutputFormat::Pretty).unwrap();
        assert!(rendered.contains("    def test_x():"));
        colored::control::unset_override();
    }
}
