//! Integration tests for the analyzers over realistic extracted inputs.
//!
//! These tests lift symbols out of Python fixtures the way a fact
//! extractor would and run the analyzers end to end.

mod common;

use std::path::PathBuf;

use devbrain::{
    BehaviorAnalyzer, BehaviorPattern, CoverageAnalyzer, DocsAnalyzer, Priority,
    RefactorAnalyzer, SecurityAnalyzer, Severity, UXAnalyzer,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load_sample(case: &str) -> String {
    let path = testdata_path().join("golden/inputs").join(case).join("sample.py");
    std::fs::read_to_string(&path).expect("should read sample fixture")
}

fn pattern(sequence: &[&str], support: f64, count: u64) -> BehaviorPattern {
    BehaviorPattern {
        sequence: sequence.iter().map(|s| s.to_string()).collect(),
        support,
        occurrence_count: count,
    }
}

#[test]
fn test_security_audit_over_fixture() {
    let source = load_sample("security_injection_patterns");
    let symbols = common::symbols_from_python(&source, "sample.py");
    let issues = SecurityAnalyzer::new().analyze(&symbols);

    let categories: Vec<&str> = issues.iter().map(|i| i.category.as_str()).collect();
    assert!(categories.contains(&"sql_injection"));
    assert!(categories.contains(&"command_injection"));
    assert!(categories.contains(&"hardcoded_secrets"));

    // The parameterized query and list-form subprocess stay clean, so the
    // three unsafe functions account for every finding.
    assert_eq!(issues.len(), 3);

    // Critical findings come first.
    let ranks: Vec<u8> = issues.iter().map(|i| i.severity.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ranks, sorted);
}

#[test]
fn test_docs_analysis_over_fixture() {
    let source = load_sample("doc_completeness");
    let symbols = common::symbols_from_python(&source, "sample.py");
    let suggestions = DocsAnalyzer::new().analyze_docs(&symbols, "google");

    let by_name = |name: &str| suggestions.iter().find(|s| s.symbol_name == name);

    assert_eq!(by_name("no_docs").unwrap().doc_type, "missing");
    assert_eq!(by_name("short_doc").unwrap().doc_type, "incomplete");
    assert!(by_name("complete_doc").is_none());
    assert_eq!(by_name("UndocumentedClass").unwrap().doc_type, "missing");
    assert!(by_name("_private_helper").is_none());
}

#[test]
fn test_complexity_analysis_over_fixture() {
    let source = load_sample("complexity_scoring");
    let symbols = common::symbols_from_python(&source, "sample.py");
    let suggestions = RefactorAnalyzer::new().analyze_code(&symbols, &[], "complexity");

    let flagged: Vec<&str> = suggestions
        .iter()
        .map(|s| s.reason.split('\'').nth(1).unwrap_or(""))
        .collect();
    assert!(flagged.contains(&"complex_handler"));
    assert!(flagged.contains(&"deeply_nested"));
    assert!(!flagged.contains(&"trivial"));
    assert!(!flagged.contains(&"moderate"));
}

#[test]
fn test_coverage_and_behavior_share_inputs() {
    let patterns = vec![
        pattern(&["login", "browse", "checkout"], 0.42, 420),
        pattern(&["login", "browse"], 0.60, 600),
        pattern(&["search", "filter", "export"], 0.08, 80),
    ];
    let tested = vec![vec!["login".to_string(), "browse".to_string()]];

    let gaps = CoverageAnalyzer::new().analyze_gaps(&patterns, &tested);
    assert_eq!(gaps.len(), 2);
    assert_eq!(gaps[0].priority, Priority::Critical);
    assert_eq!(gaps[1].priority, Priority::Low);

    let source = "def handle_login(): pass\ndef handle_browse(): pass\ndef process_checkout(): pass\n";
    let symbols = common::symbols_from_python(source, "handlers.py");
    let missing = BehaviorAnalyzer::new().find_missing_behaviors(&patterns, &symbols, 1);

    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].suggested_action, "handle_search");
}

#[test]
fn test_ux_dropoff_in_checkout_funnel() {
    let patterns = vec![
        pattern(&["view_cart"], 0.8, 800),
        pattern(&["view_cart", "enter_payment"], 0.5, 500),
        pattern(&["view_cart", "enter_payment", "confirm"], 0.15, 150),
        pattern(&["view_cart", "payment_error"], 0.05, 50),
    ];

    let insights = UXAnalyzer::new().analyze_flow(&patterns, "checkout", "dropoff");
    assert!(insights.iter().any(|i| i.finding.contains("confirm")));
    assert!(insights.iter().all(|i| i.metric == "dropoff"));

    let errors = UXAnalyzer::new().analyze_flow(&patterns, "checkout", "error_rate");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].finding.contains("payment_error"));
}

#[test]
fn test_severity_filtering_matches_ranks() {
    let source = load_sample("security_injection_patterns");
    let symbols = common::symbols_from_python(&source, "sample.py");
    let issues = SecurityAnalyzer::new().analyze(&symbols);

    let critical_only: Vec<_> = issues
        .iter()
        .filter(|i| i.severity.rank() >= Severity::Critical.rank())
        .collect();
    assert_eq!(critical_only.len(), 2);
    assert!(critical_only
        .iter()
        .all(|i| matches!(i.severity, Severity::Critical)));
}
