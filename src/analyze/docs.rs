//! Docstring completeness checks and doc stubs.
//!
//! Underscore-prefixed symbols are left alone, with one exception: the
//! constructor `__init__` is the public construction surface and gets
//! checked like any other function.

use crate::analyze::input::CodeSymbol;
use crate::analyze::types::{stable_id, DocSuggestion};

const MIN_DOC_LEN: usize = 20;

#[derive(Default)]
pub struct DocsAnalyzer;

impl DocsAnalyzer {
    pub fn new() -> Self {
        DocsAnalyzer
    }

    /// Report symbols with missing or incomplete docstrings.
    pub fn analyze_docs(&self, symbols: &[CodeSymbol], doc_style: &str) -> Vec<DocSuggestion> {
        symbols
            .iter()
            .filter(|s| !is_private(&s.name))
            .filter_map(|symbol| {
                let doc = symbol.docstring.as_deref().map(str::trim).unwrap_or("");
                let (doc_type, suggested_doc, confidence) = if doc.is_empty() {
                    ("missing", self.doc_template(symbol, doc_style), 0.9)
                } else {
                    let issues = self.check_doc_completeness(doc, &symbol.symbol_type);
                    if issues.is_empty() {
                        return None;
                    }
                    ("incomplete", format!("Missing: {}", issues.join("; ")), 0.7)
                };

                Some(DocSuggestion {
                    suggestion_id: stable_id("doc", &symbol.location()),
                    symbol_name: symbol.name.clone(),
                    symbol_type: symbol.symbol_type.clone(),
                    location: symbol.location(),
                    doc_type: doc_type.to_string(),
                    suggested_doc,
                    confidence,
                })
            })
            .collect()
    }

    /// Issues with an existing docstring.
    pub fn check_doc_completeness(&self, docstring: &str, symbol_type: &str) -> Vec<String> {
        let mut issues = Vec::new();
        let doc = docstring.trim();
        if doc.len() < MIN_DOC_LEN {
            issues.push("Add a more detailed description".to_string());
        }
        // Classes describe state, not return values.
        if symbol_type != "class" && !doc.to_lowercase().contains("return") {
            issues.push("Add a Returns section".to_string());
        }
        issues
    }

    /// Render a docstring stub for the symbol in the requested style.
    pub fn doc_template(&self, symbol: &CodeSymbol, doc_style: &str) -> String {
        if doc_style != "google" {
            return format!("Document {}.", symbol.name);
        }
        let summary = humanize(&symbol.name);
        if symbol.symbol_type == "class" {
            format!(
                "\"\"\"{summary}.\n\n\
                 Attributes:\n    \
                 TODO: describe public attributes.\n\
                 \"\"\""
            )
        } else {
            format!(
                "\"\"\"{summary}.\n\n\
                 Args:\n    \
                 TODO: describe parameters.\n\n\
                 Returns:\n    \
                 TODO: describe the return value.\n\n\
                 Raises:\n    \
                 TODO: describe raised exceptions.\n\
                 \"\"\""
            )
        }
    }
}

fn is_private(name: &str) -> bool {
    name.starts_with('_') && name != "__init__"
}

fn humanize(name: &str) -> String {
    let words = name.trim_matches('_').replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => words,
    }
}
