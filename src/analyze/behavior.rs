//! Missing-behavior detection.
//!
//! Events appearing in observed flows are matched against handler-style
//! symbols in the codebase (`handle_*`, `on_*`, `process_*`, `dispatch_*`,
//! `emit_*`), either as a whole or token by token. A flow whose events have
//! no handler is reported as a missing behavior.

use std::collections::HashSet;

use crate::analyze::input::{BehaviorPattern, CodeSymbol};
use crate::analyze::types::{stable_id, MissingBehavior};

const HANDLER_PREFIXES: &[&str] = &["handle_", "on_", "process_", "dispatch_", "emit_"];

/// Tokens this short ("do", "is") are too generic to mark an event handled.
const MIN_TOKEN_LEN: usize = 3;

#[derive(Default)]
pub struct BehaviorAnalyzer;

impl BehaviorAnalyzer {
    pub fn new() -> Self {
        BehaviorAnalyzer
    }

    /// Derive the handled-event vocabulary from symbol names. A handler
    /// name like `handle_user_signup` contributes the full stripped event
    /// (`user_signup`) plus its individual tokens (`user`, `signup`);
    /// names without a handler prefix contribute nothing.
    pub fn extract_code_events(&self, symbols: &[CodeSymbol]) -> HashSet<String> {
        let mut events = HashSet::new();
        for symbol in symbols {
            let lower = symbol.name.to_lowercase();
            for prefix in HANDLER_PREFIXES {
                if let Some(rest) = lower.strip_prefix(prefix) {
                    if rest.is_empty() {
                        continue;
                    }
                    events.insert(rest.to_string());
                    for token in rest.split('_').filter(|t| t.len() >= MIN_TOKEN_LEN) {
                        events.insert(token.to_string());
                    }
                }
            }
        }
        events
    }

    /// Flows seen at least `min_count` times whose events lack handlers.
    ///
    /// Results are sorted by observed count, most frequent first.
    pub fn find_missing_behaviors(
        &self,
        patterns: &[BehaviorPattern],
        symbols: &[CodeSymbol],
        min_count: u64,
    ) -> Vec<MissingBehavior> {
        let known = self.extract_code_events(symbols);

        let mut missing: Vec<MissingBehavior> = patterns
            .iter()
            .filter(|p| !p.sequence.is_empty())
            .filter(|p| p.occurrence_count >= min_count)
            .filter_map(|p| {
                let unhandled: Vec<String> = p
                    .sequence
                    .iter()
                    .map(|e| normalize_event(e))
                    .filter(|e| !event_is_handled(e, &known))
                    .collect();
                if unhandled.is_empty() {
                    return None;
                }
                let seed = format!("{}|{}", p.sequence.join(">"), unhandled.join(">"));
                Some(MissingBehavior {
                    behavior_id: stable_id("behavior", &seed),
                    pattern: p.sequence.clone(),
                    observed_count: p.occurrence_count,
                    description: format!(
                        "Flow '{}' was observed {} times but events [{}] have no handler in code",
                        p.sequence.join(" -> "),
                        p.occurrence_count,
                        unhandled.join(", ")
                    ),
                    suggested_action: format!("handle_{}", unhandled[0]),
                    affected_files: Vec::new(),
                })
            })
            .collect();

        missing.sort_by(|a, b| b.observed_count.cmp(&a.observed_count));
        missing
    }
}

/// An event counts as handled when the vocabulary holds the full event or
/// shares any of its meaningful tokens.
fn event_is_handled(event: &str, known: &HashSet<String>) -> bool {
    if known.contains(event) {
        return true;
    }
    event
        .split('_')
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .any(|t| known.contains(t))
}

fn normalize_event(event: &str) -> String {
    event
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
