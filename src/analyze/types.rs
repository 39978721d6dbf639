//! Result records shared by all analyzers.
//!
//! Every record serializes to the wire contract consumed by tool callers and
//! the snapshot tests; a handful of fields are renamed on the wire
//! (`suggestion_type` -> `type`, `suggested_test_name` -> `suggested_test`,
//! `suggested_test_file` -> `suggested_file`) and those names must not drift.

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Severity levels for security issues, ordered low to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Ordinal rank used for threshold filtering and sorting.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Priority assigned to coverage gaps from pattern support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Staircase classification: inclusive on the lower bound of each band.
    pub fn from_support(support: f64) -> Self {
        if support >= 0.30 {
            Priority::Critical
        } else if support >= 0.20 {
            Priority::High
        } else if support >= 0.10 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// An observed behavior flow with no matching entry in the tested set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageGap {
    pub gap_id: String,
    pub pattern: Vec<String>,
    pub support: f64,
    pub priority: Priority,
    #[serde(rename = "suggested_test")]
    pub suggested_test_name: String,
    #[serde(rename = "suggested_file")]
    pub suggested_test_file: String,
    pub description: String,
}

/// An observed behavior flow whose events have no handler in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingBehavior {
    pub behavior_id: String,
    pub pattern: Vec<String>,
    pub observed_count: u64,
    pub description: String,
    pub suggested_action: String,
    #[serde(default)]
    pub affected_files: Vec<String>,
}

/// A heuristic code-quality finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorSuggestion {
    pub suggestion_id: String,
    #[serde(rename = "type")]
    pub suggestion_type: String,
    pub location: String,
    pub reason: String,
    pub confidence: f64,
    #[serde(default)]
    pub code_before: String,
    #[serde(default)]
    pub code_after: String,
}

/// A missing or incomplete docstring finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSuggestion {
    pub suggestion_id: String,
    pub symbol_name: String,
    pub symbol_type: String,
    pub location: String,
    pub doc_type: String,
    pub suggested_doc: String,
    pub confidence: f64,
}

/// A regex-matched vulnerability indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub issue_id: String,
    pub severity: Severity,
    pub category: String,
    pub location: String,
    pub description: String,
    pub recommendation: String,
    pub confidence: f64,
    pub cwe_id: Option<String>,
}

/// A derived UX observation over a set of behavior patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UXInsight {
    pub insight_id: String,
    pub finding: String,
    pub supporting_patterns: usize,
    pub confidence: f64,
    pub suggestion: String,
    pub metric: String,
}

/// Synthesized test code for a coverage gap or a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedUnitCase {
    pub test_name: String,
    pub test_file: String,
    pub test_code: String,
    pub covers_pattern: Vec<String>,
    pub framework: String,
    pub style: String,
}

/// The original tooling exposed this record under two other names.
pub type GeneratedTest = SuggestedUnitCase;
pub type TestSuggestion = SuggestedUnitCase;

/// Build a deterministic record id: `<prefix>_<8 hex chars>`.
///
/// Identical seeds always produce identical ids, so re-running an analyzer
/// on the same inputs yields the same id set.
pub fn stable_id(prefix: &str, seed: &str) -> String {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    format!("{}_{:08x}", prefix, hasher.finish() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_staircase() {
        assert_eq!(Priority::from_support(0.30), Priority::Critical);
        assert_eq!(Priority::from_support(0.45), Priority::Critical);
        assert_eq!(Priority::from_support(0.29), Priority::High);
        assert_eq!(Priority::from_support(0.20), Priority::High);
        assert_eq!(Priority::from_support(0.19), Priority::Medium);
        assert_eq!(Priority::from_support(0.10), Priority::Medium);
        assert_eq!(Priority::from_support(0.09), Priority::Low);
    }

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Low.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Critical.rank());
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("bogus".parse::<Severity>().is_err());
    }

    #[test]
    fn test_stable_id_is_deterministic() {
        assert_eq!(stable_id("gap", "login>checkout"), stable_id("gap", "login>checkout"));
        assert_ne!(stable_id("gap", "a"), stable_id("gap", "b"));
        assert!(stable_id("behavior", "x").starts_with("behavior_"));
    }

    #[test]
    fn test_refactor_suggestion_serializes_type_key() {
        let suggestion = RefactorSuggestion {
            suggestion_id: "ref_001".to_string(),
            suggestion_type: "extract_common".to_string(),
            location: "validators.py:20".to_string(),
            reason: "Similar code in multiple places".to_string(),
            confidence: 0.72,
            code_before: String::new(),
            code_after: String::new(),
        };

        let value = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(value["type"], "extract_common");
        assert!(value.get("suggestion_type").is_none());
    }

    #[test]
    fn test_coverage_gap_serializes_renamed_keys() {
        let gap = CoverageGap {
            gap_id: "gap_002".to_string(),
            pattern: vec!["search".to_string(), "filter".to_string()],
            support: 0.10,
            priority: Priority::Medium,
            suggested_test_name: "test_search_filter".to_string(),
            suggested_test_file: "tests/test_search.py".to_string(),
            description: "Search filter flow".to_string(),
        };

        let value = serde_json::to_value(&gap).unwrap();
        assert_eq!(value["suggested_test"], "test_search_filter");
        assert_eq!(value["suggested_file"], "tests/test_search.py");
        assert_eq!(value["priority"], "medium");
    }

    #[test]
    fn test_suggested_case_aliases() {
        let case: GeneratedTest = SuggestedUnitCase {
            test_name: "test_flow".to_string(),
            test_file: "tests/test_flow.py".to_string(),
            test_code: String::new(),
            covers_pattern: Vec::new(),
            framework: "pytest".to_string(),
            style: "unit".to_string(),
        };
        let echoed: TestSuggestion = case;
        assert_eq!(echoed.test_name, "test_flow");
    }

    #[test]
    fn test_security_issue_optional_cwe() {
        let issue = SecurityIssue {
            issue_id: "sec_001".to_string(),
            severity: Severity::Medium,
            category: "hardcoded_secrets".to_string(),
            location: "config.py:10".to_string(),
            description: "Hardcoded password".to_string(),
            recommendation: "Use environment variables".to_string(),
            confidence: 0.7,
            cwe_id: None,
        };

        let value = serde_json::to_value(&issue).unwrap();
        assert!(value["cwe_id"].is_null());
    }
}
