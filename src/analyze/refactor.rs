//! Refactor heuristics over extracted symbols.
//!
//! Three independent checks, selected by analysis type: branch-count
//! complexity, numbered-sibling duplication, and naming smells. An
//! unrecognized analysis type yields no suggestions.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analyze::input::{BehaviorPattern, CodeSymbol};
use crate::analyze::types::{stable_id, RefactorSuggestion};

const MAX_NAME_LEN: usize = 50;

lazy_static! {
    static ref BRANCH_KEYWORD: Regex =
        Regex::new(r"\b(if|elif|for|while|except|and|or)\b").unwrap();
    static ref NUMERIC_SUFFIX: Regex = Regex::new(r"\d+$").unwrap();
    static ref TRIPLE_QUOTED: Regex = Regex::new(r#"(?s)("""|''').*?("""|''')"#).unwrap();
}

pub struct RefactorAnalyzer {
    complexity_threshold: usize,
}

impl Default for RefactorAnalyzer {
    fn default() -> Self {
        RefactorAnalyzer {
            complexity_threshold: 5,
        }
    }
}

impl RefactorAnalyzer {
    pub fn new() -> Self {
        RefactorAnalyzer::default()
    }

    pub fn with_threshold(complexity_threshold: usize) -> Self {
        RefactorAnalyzer {
            complexity_threshold,
        }
    }

    /// Run the check named by `analysis_type` over the symbols.
    pub fn analyze_code(
        &self,
        symbols: &[CodeSymbol],
        _patterns: &[BehaviorPattern],
        analysis_type: &str,
    ) -> Vec<RefactorSuggestion> {
        match analysis_type {
            "complexity" => self.check_complexity(symbols),
            "duplication" => self.check_duplication(symbols),
            "naming" => self.check_naming(symbols),
            _ => Vec::new(),
        }
    }

    /// Flag functions whose source contains more branch constructs than the
    /// threshold. Symbols without source text are skipped.
    fn check_complexity(&self, symbols: &[CodeSymbol]) -> Vec<RefactorSuggestion> {
        symbols
            .iter()
            .filter_map(|symbol| {
                let source = symbol.source_code.as_deref()?;
                // Docstrings would otherwise contribute phantom branches.
                let stripped = TRIPLE_QUOTED.replace_all(source, "");
                let branches = BRANCH_KEYWORD.find_iter(&stripped).count();
                if branches <= self.complexity_threshold {
                    return None;
                }
                Some(RefactorSuggestion {
                    suggestion_id: stable_id("complex", &symbol.location()),
                    suggestion_type: "reduce_complexity".to_string(),
                    location: symbol.location(),
                    reason: format!(
                        "Function '{}' has {} branch constructs, consider splitting it",
                        symbol.name, branches
                    ),
                    confidence: (0.5 + 0.05 * branches as f64).min(1.0),
                    code_before: String::new(),
                    code_after: String::new(),
                })
            })
            .collect()
    }

    /// Flag families of numbered siblings in the same file, like
    /// `handler1`/`handler2`/`handler3`.
    fn check_duplication(&self, symbols: &[CodeSymbol]) -> Vec<RefactorSuggestion> {
        let mut families: HashMap<(String, String), Vec<&CodeSymbol>> = HashMap::new();
        for symbol in symbols {
            let stem = NUMERIC_SUFFIX.replace(&symbol.name, "").to_string();
            if stem.is_empty() || stem == symbol.name {
                continue;
            }
            families
                .entry((symbol.file_path.clone(), stem))
                .or_default()
                .push(symbol);
        }

        let mut suggestions: Vec<RefactorSuggestion> = families
            .into_iter()
            .filter(|(_, members)| members.len() >= 3)
            .map(|((file_path, stem), members)| {
                let first = members
                    .iter()
                    .min_by_key(|s| s.line)
                    .map(|s| s.line)
                    .unwrap_or(0);
                RefactorSuggestion {
                    suggestion_id: stable_id("dup", &format!("{}:{}", file_path, stem)),
                    suggestion_type: "extract_common".to_string(),
                    location: format!("{}:{}", file_path, first),
                    reason: format!(
                        "{} near-identical functions named '{}N' in the same file, extract the shared logic",
                        members.len(),
                        stem
                    ),
                    confidence: 0.7,
                    code_before: String::new(),
                    code_after: String::new(),
                }
            })
            .collect();

        suggestions.sort_by(|a, b| a.location.cmp(&b.location));
        suggestions
    }

    /// Flag over-long and single-letter function names.
    fn check_naming(&self, symbols: &[CodeSymbol]) -> Vec<RefactorSuggestion> {
        symbols
            .iter()
            .filter_map(|symbol| {
                let name = symbol.name.as_str();
                let (reason, confidence) = if name.len() > MAX_NAME_LEN {
                    let shown: String = name.chars().take(30).collect();
                    (
                        format!("Name '{}...' is too long ({} chars)", shown, name.len()),
                        0.6,
                    )
                } else if name.len() == 1 {
                    (
                        format!("Name '{}' is a single-letter identifier", name),
                        0.5,
                    )
                } else {
                    return None;
                };
                Some(RefactorSuggestion {
                    suggestion_id: stable_id("name", &symbol.location()),
                    suggestion_type: "rename".to_string(),
                    location: symbol.location(),
                    reason,
                    confidence,
                    code_before: String::new(),
                    code_after: String::new(),
                })
            })
            .collect()
    }
}
