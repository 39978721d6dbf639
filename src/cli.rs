//! Command-line interface for devbrain.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::BrainConfig;
use crate::report::{self, OutputFormat};
use crate::tools::ToolDispatcher;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Developer insight engine over pre-extracted code facts.
///
/// Devbrain analyzes mined behavior flows and code symbols to surface
/// untested flows, unhandled events, refactor candidates, documentation
/// gaps, and security smells, and synthesizes test skeletons for the
/// gaps it finds.
#[derive(Parser)]
#[command(name = "devbrain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one analysis tool against a JSON argument payload
    Run(RunArgs),
    /// List the available tools
    Tools,
    /// Show the engine configuration summary
    Stats(StatsArgs),
}

/// Arguments for the run command.
#[derive(Parser)]
pub struct RunArgs {
    /// Tool name (see `devbrain tools`)
    pub tool: String,

    /// Inline JSON arguments for the tool
    #[arg(short, long)]
    pub args: Option<String>,

    /// Read JSON arguments from a file instead
    #[arg(long)]
    pub args_file: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the stats command.
#[derive(Parser)]
pub struct StatsArgs {
    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// One-line descriptions shown by `devbrain tools`.
struct ToolHelp {
    name: &'static str,
    description: &'static str,
}

static TOOL_HELP: &[ToolHelp] = &[
    ToolHelp {
        name: "coverage_analyze",
        description: "Find observed flows with no matching test",
    },
    ToolHelp {
        name: "behavior_missing",
        description: "Find flow events with no handler in code",
    },
    ToolHelp {
        name: "refactor_suggest",
        description: "Complexity, duplication, and naming heuristics",
    },
    ToolHelp {
        name: "ux_insights",
        description: "Dropoff points and error events in flows",
    },
    ToolHelp {
        name: "tests_generate",
        description: "Render a test skeleton for a coverage gap",
    },
    ToolHelp {
        name: "docs_generate",
        description: "Missing and incomplete docstring suggestions",
    },
    ToolHelp {
        name: "security_audit",
        description: "Regex scan of symbol source for vulnerability patterns",
    },
    ToolHelp {
        name: "smart_tests_generate",
        description: "Generate a full pytest file for a Python source file",
    },
    ToolHelp {
        name: "brain_stats",
        description: "Engine configuration summary",
    },
];

/// Run a single tool and print its rendered result.
pub fn run_tool(args: &RunArgs) -> Result<i32> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let config = BrainConfig::load(args.config.as_deref())?;

    let payload: Value = match (&args.args, &args.args_file) {
        (Some(inline), _) => {
            serde_json::from_str(inline).context("failed to parse --args as JSON")?
        }
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read args file: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse args file: {}", path.display()))?
        }
        (None, None) => Value::Object(Default::default()),
    };

    let result = ToolDispatcher::new(config).dispatch(&args.tool, &payload)?;
    println!("{}", report::render(&args.tool, &result, format)?);

    // A tool that reports its own failure still renders, but exits non-zero.
    if result.get("success") == Some(&Value::Bool(false)) {
        return Ok(EXIT_FAILED);
    }
    Ok(EXIT_SUCCESS)
}

/// List the available tools.
pub fn run_tools() -> Result<i32> {
    println!("Available tools:");
    for help in TOOL_HELP {
        println!("  {:22} {}", help.name, help.description);
    }
    Ok(EXIT_SUCCESS)
}

/// Print the engine configuration summary.
pub fn run_stats(args: &StatsArgs) -> Result<i32> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let config = BrainConfig::load(args.config.as_deref())?;
    let result = ToolDispatcher::new(config).dispatch("brain_stats", &Value::Null)?;
    println!("{}", report::render("brain_stats", &result, format)?);
    Ok(EXIT_SUCCESS)
}
