//! Input records accepted by the analyzers.
//!
//! Callers pass pre-extracted facts about a codebase: mined behavior flows
//! and symbols lifted from source files. All fields are lenient so that
//! partially-populated payloads still deserialize.

use serde::{Deserialize, Serialize};

/// A mined sequence of events with its frequency among all sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorPattern {
    #[serde(default)]
    pub sequence: Vec<String>,
    #[serde(default)]
    pub support: f64,
    #[serde(default)]
    pub occurrence_count: u64,
}

/// A function or class lifted from a source file, with optional docstring
/// and source text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeSymbol {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "kind")]
    pub symbol_type: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default, alias = "start_line")]
    pub line: u64,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub source_code: Option<String>,
}

impl CodeSymbol {
    /// `file:line` location string used in findings.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path, self.line)
    }
}
