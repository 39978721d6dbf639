//! Regex-based security scanning over symbol source text.
//!
//! Each rule is a compiled pattern tied to a category, severity, and CWE.
//! The patterns aim at the obviously-dangerous forms (f-string SQL,
//! `os.system`, `eval`) while leaving the parameterized and list-argument
//! forms alone.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::input::CodeSymbol;
use crate::analyze::types::{stable_id, SecurityIssue, Severity};

struct SecurityRule {
    pattern: Regex,
    category: &'static str,
    severity: Severity,
    cwe_id: &'static str,
    description: &'static str,
    recommendation: &'static str,
    confidence: f64,
}

static SECURITY_RULES: Lazy<Vec<SecurityRule>> = Lazy::new(|| {
    vec![
        SecurityRule {
            pattern: Regex::new(r#"execute\s*\(\s*f["']"#).unwrap(),
            category: "sql_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-89",
            description: "SQL query built from an f-string",
            recommendation: "Use parameterized queries instead of string interpolation",
            confidence: 0.9,
        },
        SecurityRule {
            pattern: Regex::new(r#"execute\s*\(.*["']\s*%\s"#).unwrap(),
            category: "sql_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-89",
            description: "SQL query built with %-formatting",
            recommendation: "Use parameterized queries instead of string interpolation",
            confidence: 0.9,
        },
        SecurityRule {
            pattern: Regex::new(r#"execute\s*\(.*["']\s*\+"#).unwrap(),
            category: "sql_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-89",
            description: "SQL query built with string concatenation",
            recommendation: "Use parameterized queries instead of string interpolation",
            confidence: 0.9,
        },
        SecurityRule {
            pattern: Regex::new(r"os\.system\s*\(").unwrap(),
            category: "command_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-78",
            description: "Shell command executed via os.system",
            recommendation: "Use subprocess.run with a list argument and shell disabled",
            confidence: 0.85,
        },
        SecurityRule {
            pattern: Regex::new(r#"subprocess\.\w+\s*\(\s*f["']"#).unwrap(),
            category: "command_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-78",
            description: "Shell command built from an f-string",
            recommendation: "Pass command arguments as a list, never interpolate input",
            confidence: 0.85,
        },
        SecurityRule {
            pattern: Regex::new(r"shell\s*=\s*True").unwrap(),
            category: "command_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-78",
            description: "Subprocess invoked with shell=True",
            recommendation: "Pass command arguments as a list and drop shell=True",
            confidence: 0.8,
        },
        SecurityRule {
            pattern: Regex::new(r"\beval\s*\(").unwrap(),
            category: "command_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-95",
            description: "Dynamic code evaluation via eval",
            recommendation: "Replace eval with ast.literal_eval or explicit parsing",
            confidence: 0.85,
        },
        SecurityRule {
            pattern: Regex::new(r"\bexec\s*\(").unwrap(),
            category: "command_injection",
            severity: Severity::Critical,
            cwe_id: "CWE-95",
            description: "Dynamic code execution via exec",
            recommendation: "Remove exec and call the needed code directly",
            confidence: 0.85,
        },
        SecurityRule {
            pattern: Regex::new(
                r#"(?i)\b(password|passwd|pwd|secret|api_key|apikey|access_token|auth_token|token)\s*=\s*["'][^"']+["']"#,
            )
            .unwrap(),
            category: "hardcoded_secrets",
            severity: Severity::High,
            cwe_id: "CWE-798",
            description: "Credential assigned from a string literal",
            recommendation: "Load secrets from the environment or a secrets manager",
            confidence: 0.75,
        },
        SecurityRule {
            pattern: Regex::new(r"\b(md5|sha1)\s*\(").unwrap(),
            category: "insecure_crypto",
            severity: Severity::Medium,
            cwe_id: "CWE-327",
            description: "Weak hash algorithm",
            recommendation: "Use SHA-256 or stronger for anything security sensitive",
            confidence: 0.7,
        },
        SecurityRule {
            pattern: Regex::new(r"pickle\.loads?\s*\(").unwrap(),
            category: "insecure_deserialization",
            severity: Severity::High,
            cwe_id: "CWE-502",
            description: "Pickle deserialization of untrusted data",
            recommendation: "Deserialize with json or another data-only format",
            confidence: 0.8,
        },
        SecurityRule {
            pattern: Regex::new(r"marshal\.loads?\s*\(").unwrap(),
            category: "insecure_deserialization",
            severity: Severity::High,
            cwe_id: "CWE-502",
            description: "Marshal deserialization of untrusted data",
            recommendation: "Deserialize with json or another data-only format",
            confidence: 0.8,
        },
        SecurityRule {
            pattern: Regex::new(r"yaml\.load\s*\(").unwrap(),
            category: "insecure_deserialization",
            severity: Severity::High,
            cwe_id: "CWE-502",
            description: "yaml.load without a safe loader",
            recommendation: "Use yaml.safe_load",
            confidence: 0.8,
        },
    ]
});

#[derive(Default)]
pub struct SecurityAnalyzer;

impl SecurityAnalyzer {
    pub fn new() -> Self {
        SecurityAnalyzer
    }

    /// Scan the source text of every symbol. One issue per (rule, line).
    ///
    /// Results are sorted by severity descending, then location.
    pub fn analyze(&self, symbols: &[CodeSymbol]) -> Vec<SecurityIssue> {
        let mut issues = Vec::new();
        for symbol in symbols {
            let Some(source) = symbol.source_code.as_deref() else {
                continue;
            };
            for (offset, line) in source.lines().enumerate() {
                let line_no = symbol.line + offset as u64;
                for rule in SECURITY_RULES.iter() {
                    if rule.pattern.is_match(line) {
                        let location = format!("{}:{}", symbol.file_path, line_no);
                        issues.push(SecurityIssue {
                            issue_id: stable_id(
                                "sec",
                                &format!("{}:{}:{}", rule.category, location, rule.description),
                            ),
                            severity: rule.severity,
                            category: rule.category.to_string(),
                            location,
                            description: rule.description.to_string(),
                            recommendation: rule.recommendation.to_string(),
                            confidence: rule.confidence,
                            cwe_id: Some(rule.cwe_id.to_string()),
                        });
                    }
                }
            }
        }

        issues.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then_with(|| a.location.cmp(&b.location))
                .then_with(|| a.category.cmp(&b.category))
        });
        issues
    }
}
