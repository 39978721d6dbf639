//! Coverage-gap detection.
//!
//! Compares mined behavior flows against the set of flows that already have
//! tests, and emits a gap record for every sufficiently frequent flow with
//! no matching test.

use std::collections::HashSet;

use crate::analyze::input::BehaviorPattern;
use crate::analyze::types::{stable_id, CoverageGap, Priority};

pub struct CoverageAnalyzer {
    min_support: f64,
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        CoverageAnalyzer { min_support: 0.05 }
    }
}

impl CoverageAnalyzer {
    pub fn new() -> Self {
        CoverageAnalyzer::default()
    }

    pub fn with_min_support(min_support: f64) -> Self {
        CoverageAnalyzer { min_support }
    }

    /// Find observed flows with no exact-sequence match in the tested set.
    ///
    /// Results are sorted by support, most frequent first.
    pub fn analyze_gaps(
        &self,
        patterns: &[BehaviorPattern],
        tested_patterns: &[Vec<String>],
    ) -> Vec<CoverageGap> {
        let tested: HashSet<&[String]> =
            tested_patterns.iter().map(|p| p.as_slice()).collect();

        let mut gaps: Vec<CoverageGap> = patterns
            .iter()
            .filter(|p| !p.sequence.is_empty())
            .filter(|p| p.support >= self.min_support)
            .filter(|p| !tested.contains(p.sequence.as_slice()))
            .map(|p| self.gap_for(p))
            .collect();

        gaps.sort_by(|a, b| b.support.total_cmp(&a.support));
        gaps
    }

    /// Share of observed flows that have a matching test, as a percentage.
    /// No observed flows means nothing is uncovered, so 100.0.
    pub fn coverage_percentage(
        &self,
        patterns: &[BehaviorPattern],
        tested_patterns: &[Vec<String>],
    ) -> f64 {
        if patterns.is_empty() {
            return 100.0;
        }
        let tested: HashSet<&[String]> =
            tested_patterns.iter().map(|p| p.as_slice()).collect();
        let covered = patterns
            .iter()
            .filter(|p| tested.contains(p.sequence.as_slice()))
            .count();
        (covered as f64 / patterns.len() as f64 * 100.0 * 10.0).round() / 10.0
    }

    /// Build the gap record for a single flow without any filtering.
    pub fn gap_for_pattern(&self, pattern: &BehaviorPattern) -> CoverageGap {
        self.gap_for(pattern)
    }

    fn gap_for(&self, pattern: &BehaviorPattern) -> CoverageGap {
        let flow = pattern.sequence.join(" -> ");
        let seed = pattern.sequence.join(">");
        let last_event = pattern
            .sequence
            .last()
            .map(|s| normalize_event(s))
            .unwrap_or_default();

        CoverageGap {
            gap_id: stable_id("gap", &seed),
            pattern: pattern.sequence.clone(),
            support: pattern.support,
            priority: Priority::from_support(pattern.support),
            suggested_test_name: format!(
                "test_{}_flow",
                pattern
                    .sequence
                    .iter()
                    .map(|s| normalize_event(s))
                    .collect::<Vec<_>>()
                    .join("_")
            ),
            suggested_test_file: format!("tests/test_{}.py", last_event),
            description: format!(
                "User flow '{}' occurs in {:.1}% of sessions but has no test coverage",
                flow,
                pattern.support * 100.0
            ),
        }
    }
}

/// Lowercase an event name and fold separators into underscores so it can
/// be embedded in a Python identifier.
fn normalize_event(event: &str) -> String {
    event
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
