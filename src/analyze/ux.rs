//! UX signals derived from behavior flows.
//!
//! Two metrics: step dropoff (a flow extension seen far less often than its
//! prefix) and error events (flow steps whose names indicate failures). The
//! flow type is carried through to the report but does not change the math.

use std::collections::BTreeMap;

use crate::analyze::input::BehaviorPattern;
use crate::analyze::types::{stable_id, UXInsight};

const ERROR_MARKERS: &[&str] = &["error", "fail", "exception", "crash", "timeout"];

pub struct UXAnalyzer {
    dropoff_threshold: f64,
}

impl Default for UXAnalyzer {
    fn default() -> Self {
        UXAnalyzer {
            dropoff_threshold: 0.3,
        }
    }
}

impl UXAnalyzer {
    pub fn new() -> Self {
        UXAnalyzer::default()
    }

    pub fn with_threshold(dropoff_threshold: f64) -> Self {
        UXAnalyzer { dropoff_threshold }
    }

    /// Run the requested metric over the flows. The flow type is advisory
    /// context; an unrecognized metric yields no insights.
    pub fn analyze_flow(
        &self,
        patterns: &[BehaviorPattern],
        _flow_type: &str,
        metric: &str,
    ) -> Vec<UXInsight> {
        let mut insights = match metric {
            "dropoff" => self.find_dropoffs(patterns),
            "error_rate" => self.find_error_events(patterns),
            _ => Vec::new(),
        };
        insights.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        insights
    }

    /// A flow one step longer than another, seen much less often, marks the
    /// extra step as a dropoff point.
    fn find_dropoffs(&self, patterns: &[BehaviorPattern]) -> Vec<UXInsight> {
        let mut insights = Vec::new();
        for shorter in patterns {
            if shorter.occurrence_count == 0 || shorter.sequence.is_empty() {
                continue;
            }
            for longer in patterns {
                if longer.sequence.len() != shorter.sequence.len() + 1 {
                    continue;
                }
                if !longer.sequence.starts_with(&shorter.sequence) {
                    continue;
                }
                let drop =
                    1.0 - longer.occurrence_count as f64 / shorter.occurrence_count as f64;
                if drop <= self.dropoff_threshold {
                    continue;
                }
                let last_reached = &shorter.sequence[shorter.sequence.len() - 1];
                let lost_step = &longer.sequence[longer.sequence.len() - 1];
                insights.push(UXInsight {
                    insight_id: stable_id(
                        "ux",
                        &format!("dropoff:{}>{}", shorter.sequence.join(">"), lost_step),
                    ),
                    finding: format!(
                        "{:.0}% of users drop off between '{}' and '{}'",
                        drop * 100.0,
                        last_reached,
                        lost_step
                    ),
                    supporting_patterns: 2,
                    confidence: (0.4 + 0.5 * drop).min(0.95),
                    suggestion: format!(
                        "Investigate friction at the '{}' step",
                        lost_step
                    ),
                    metric: "dropoff".to_string(),
                });
            }
        }
        insights
    }

    /// Flow steps whose names contain an error marker, aggregated by step.
    fn find_error_events(&self, patterns: &[BehaviorPattern]) -> Vec<UXInsight> {
        let mut counts: BTreeMap<String, (u64, usize)> = BTreeMap::new();
        for pattern in patterns {
            for event in &pattern.sequence {
                let lower = event.to_lowercase();
                if ERROR_MARKERS.iter().any(|m| lower.contains(m)) {
                    let entry = counts.entry(event.clone()).or_insert((0, 0));
                    entry.0 += pattern.occurrence_count;
                    entry.1 += 1;
                }
            }
        }

        counts
            .into_iter()
            .map(|(event, (count, pattern_count))| UXInsight {
                insight_id: stable_id("ux", &format!("error_rate:{}", event)),
                finding: format!(
                    "Error event '{}' appears in {} observed sessions",
                    event, count
                ),
                supporting_patterns: pattern_count,
                confidence: (0.3 + 0.005 * count as f64).min(0.95),
                suggestion: format!("Investigate the cause of '{}'", event),
                metric: "error_rate".to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(sequence: &[&str], count: u64) -> BehaviorPattern {
        BehaviorPattern {
            sequence: sequence.iter().map(|s| s.to_string()).collect(),
            support: 0.1,
            occurrence_count: count,
        }
    }

    #[test]
    fn test_steep_dropoff_is_reported() {
        let analyzer = UXAnalyzer::new();
        let patterns = vec![
            pattern(&["view_cart"], 100),
            pattern(&["view_cart", "checkout"], 40),
        ];
        let insights = analyzer.analyze_flow(&patterns, "checkout", "dropoff");

        assert_eq!(insights.len(), 1);
        assert!(insights[0].insight_id.starts_with("ux_"));
        assert!(insights[0].finding.contains("60%"));
        assert!(insights[0].finding.contains("checkout"));
        assert_eq!(insights[0].metric, "dropoff");
        assert!((insights[0].confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_shallow_dropoff_is_ignored() {
        let analyzer = UXAnalyzer::new();
        let patterns = vec![
            pattern(&["view_cart"], 100),
            pattern(&["view_cart", "checkout"], 90),
        ];
        assert!(analyzer.analyze_flow(&patterns, "checkout", "dropoff").is_empty());
    }

    #[test]
    fn test_error_events_aggregate_counts() {
        let analyzer = UXAnalyzer::new();
        let patterns = vec![
            pattern(&["checkout", "payment_error"], 30),
            pattern(&["retry", "payment_error"], 10),
        ];
        let insights = analyzer.analyze_flow(&patterns, "checkout", "error_rate");

        assert_eq!(insights.len(), 1);
        assert!(insights[0].finding.contains("payment_error"));
        assert!(insights[0].finding.contains("40"));
        assert_eq!(insights[0].supporting_patterns, 2);
        assert_eq!(insights[0].metric, "error_rate");
    }

    #[test]
    fn test_error_confidence_is_capped() {
        let analyzer = UXAnalyzer::new();
        let patterns = vec![pattern(&["save_failed"], 10_000)];
        let insights = analyzer.analyze_flow(&patterns, "save", "error_rate");
        assert_eq!(insights[0].confidence, 0.95);
    }

    #[test]
    fn test_unknown_metric_yields_nothing() {
        let analyzer = UXAnalyzer::new();
        let patterns = vec![
            pattern(&["start"], 100),
            pattern(&["start", "finish"], 10),
            pattern(&["start", "save_error"], 20),
        ];
        assert!(analyzer.analyze_flow(&patterns, "onboarding", "all").is_empty());
    }

    #[test]
    fn test_no_patterns_no_insights() {
        let analyzer = UXAnalyzer::new();
        assert!(analyzer.analyze_flow(&[], "checkout", "dropoff").is_empty());
    }
}
