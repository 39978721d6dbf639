//! Devbrain - developer insight engine.
//!
//! Devbrain turns pre-extracted code facts (mined behavior flows and
//! symbols lifted from source files) into actionable findings: untested
//! flows, unhandled events, refactor candidates, documentation gaps, and
//! security smells. It also synthesizes test skeletons for the gaps it
//! finds, up to a full pytest file for a Python module.
//!
//! # Architecture
//!
//! - `analyze`: the six heuristic analyzers and their input/result records
//! - `generate`: test synthesis, from gap templates to whole-file pytest
//! - `tools`: the named-operation dispatch layer over the analyzers
//! - `config`: YAML-loaded runtime thresholds
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line entry points

pub mod analyze;
pub mod cli;
pub mod config;
pub mod generate;
pub mod report;
pub mod tools;

pub use analyze::{
    BehaviorAnalyzer, BehaviorPattern, CodeSymbol, CoverageAnalyzer, CoverageGap, DocsAnalyzer,
    MissingBehavior, Priority, RefactorAnalyzer, RefactorSuggestion, SecurityAnalyzer,
    SecurityIssue, Severity, SuggestedUnitCase, UXAnalyzer, UXInsight,
};
pub use config::BrainConfig;
pub use generate::{CodeTestGenerator, GenerateError, SmartPytestFileGenerator};
pub use tools::{ToolDispatcher, TOOL_NAMES};
