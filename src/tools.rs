//! Tool dispatch.
//!
//! Every operation takes a JSON argument object and returns a JSON result.
//! List results are filtered by the configured confidence floor and capped
//! at `max_suggestions`; the `total_found` fields report the pre-cap count.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analyze::{
    BehaviorAnalyzer, BehaviorPattern, CodeSymbol, CoverageAnalyzer, CoverageGap, DocsAnalyzer,
    RefactorAnalyzer, SecurityAnalyzer, Severity, UXAnalyzer,
};
use crate::config::BrainConfig;
use crate::generate::{CodeTestGenerator, SmartPytestFileGenerator};

pub static TOOL_NAMES: &[&str] = &[
    "coverage_analyze",
    "behavior_missing",
    "refactor_suggest",
    "ux_insights",
    "tests_generate",
    "docs_generate",
    "security_audit",
    "smart_tests_generate",
    "brain_stats",
];

#[derive(Debug, Default, Deserialize)]
struct CoverageArgs {
    #[serde(default)]
    patterns: Vec<BehaviorPattern>,
    #[serde(default, alias = "tested_patterns")]
    test_patterns: Vec<Vec<String>>,
    min_support: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct BehaviorArgs {
    #[serde(default)]
    patterns: Vec<BehaviorPattern>,
    #[serde(default, alias = "symbols")]
    code_symbols: Vec<CodeSymbol>,
    #[serde(default = "default_min_count")]
    min_count: u64,
}

fn default_min_count() -> u64 {
    1
}

#[derive(Debug, Default, Deserialize)]
struct RefactorArgs {
    #[serde(default)]
    symbols: Vec<CodeSymbol>,
    #[serde(default)]
    patterns: Vec<BehaviorPattern>,
    #[serde(default = "default_analysis_type")]
    analysis_type: String,
}

fn default_analysis_type() -> String {
    "all".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct UxArgs {
    #[serde(default)]
    patterns: Vec<BehaviorPattern>,
    #[serde(default = "default_flow_type")]
    flow_type: String,
    #[serde(default = "default_metric")]
    metric: String,
}

fn default_flow_type() -> String {
    "general".to_string()
}

fn default_metric() -> String {
    "dropoff".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct TestsArgs {
    gap: Option<CoverageGap>,
    #[serde(default)]
    pattern: Vec<String>,
    framework: Option<String>,
    style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocsArgs {
    #[serde(default)]
    symbols: Vec<CodeSymbol>,
    #[serde(default = "default_doc_style")]
    doc_style: String,
}

fn default_doc_style() -> String {
    "google".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct SecurityArgs {
    #[serde(default)]
    symbols: Vec<CodeSymbol>,
    #[serde(default = "default_severity_threshold")]
    severity_threshold: String,
}

fn default_severity_threshold() -> String {
    "low".to_string()
}

#[derive(Debug, Deserialize)]
struct SmartArgs {
    file_path: String,
}

pub struct ToolDispatcher {
    config: BrainConfig,
}

impl ToolDispatcher {
    pub fn new(config: BrainConfig) -> Self {
        ToolDispatcher { config }
    }

    /// Run one tool by name. Unknown names are an error.
    pub fn dispatch(&self, name: &str, args: &Value) -> Result<Value> {
        match name {
            "coverage_analyze" => self.coverage_analyze(args),
            "behavior_missing" => self.behavior_missing(args),
            "refactor_suggest" => self.refactor_suggest(args),
            "ux_insights" => self.ux_insights(args),
            "tests_generate" => self.tests_generate(args),
            "docs_generate" => self.docs_generate(args),
            "security_audit" => self.security_audit(args),
            "smart_tests_generate" => self.smart_tests_generate(args),
            "brain_stats" => self.brain_stats(),
            _ => bail!("unknown tool: {}", name),
        }
    }

    fn coverage_analyze(&self, args: &Value) -> Result<Value> {
        let args: CoverageArgs = parse_args(args)?;
        let analyzer = CoverageAnalyzer::with_min_support(
            args.min_support.unwrap_or(self.config.min_gap_support),
        );
        let gaps = analyzer.analyze_gaps(&args.patterns, &args.test_patterns);
        let coverage = analyzer.coverage_percentage(&args.patterns, &args.test_patterns);
        let shown: Vec<&CoverageGap> = gaps.iter().take(self.config.max_suggestions).collect();

        Ok(json!({
            "gaps_found": gaps.len(),
            "coverage_percentage": coverage,
            "gaps": shown,
        }))
    }

    fn behavior_missing(&self, args: &Value) -> Result<Value> {
        let args: BehaviorArgs = parse_args(args)?;
        let missing = BehaviorAnalyzer::new().find_missing_behaviors(
            &args.patterns,
            &args.code_symbols,
            args.min_count,
        );

        Ok(json!({
            "total_found": missing.len(),
            "missing_behaviors": missing
                .iter()
                .take(self.config.max_suggestions)
                .collect::<Vec<_>>(),
        }))
    }

    fn refactor_suggest(&self, args: &Value) -> Result<Value> {
        let args: RefactorArgs = parse_args(args)?;
        let analyzer = RefactorAnalyzer::with_threshold(self.config.complexity_threshold);
        let mut suggestions =
            analyzer.analyze_code(&args.symbols, &args.patterns, &args.analysis_type);
        suggestions.retain(|s| s.confidence >= self.config.min_confidence);

        Ok(json!({
            "total_found": suggestions.len(),
            "suggestions": suggestions
                .iter()
                .take(self.config.max_suggestions)
                .collect::<Vec<_>>(),
        }))
    }

    fn ux_insights(&self, args: &Value) -> Result<Value> {
        let args: UxArgs = parse_args(args)?;
        let analyzer = UXAnalyzer::with_threshold(self.config.dropoff_threshold);
        let insights = analyzer.analyze_flow(&args.patterns, &args.flow_type, &args.metric);

        Ok(json!({
            "total_found": insights.len(),
            "flow_type": args.flow_type,
            "metric": args.metric,
            "insights": insights
                .iter()
                .take(self.config.max_suggestions)
                .collect::<Vec<_>>(),
        }))
    }

    fn tests_generate(&self, args: &Value) -> Result<Value> {
        let args: TestsArgs = parse_args(args)?;
        let gap = match args.gap {
            Some(gap) => gap,
            None if !args.pattern.is_empty() => {
                // Synthesize a gap record so bare patterns work too.
                CoverageAnalyzer::new().gap_for_pattern(&BehaviorPattern {
                    sequence: args.pattern,
                    support: 0.0,
                    occurrence_count: 0,
                })
            }
            None => bail!("tests_generate requires a 'gap' object or a 'pattern' array"),
        };
        let framework = args
            .framework
            .unwrap_or_else(|| self.config.default_test_framework.clone());
        let style = args.style.unwrap_or_else(|| self.config.test_style.clone());
        let case = CodeTestGenerator::new().generate_test(&gap, &framework, &style);

        Ok(json!({
            "test_name": case.test_name,
            "test_file": case.test_file,
            "test_code": case.test_code,
            "covers_pattern": case.covers_pattern,
            "framework": case.framework,
            "style": case.style,
        }))
    }

    fn docs_generate(&self, args: &Value) -> Result<Value> {
        let args: DocsArgs = parse_args(args)?;
        let mut suggestions = DocsAnalyzer::new().analyze_docs(&args.symbols, &args.doc_style);
        suggestions.retain(|s| s.confidence >= self.config.min_confidence);

        Ok(json!({
            "total_found": suggestions.len(),
            "doc_style": args.doc_style,
            "suggestions": suggestions
                .iter()
                .take(self.config.max_suggestions)
                .collect::<Vec<_>>(),
        }))
    }

    fn security_audit(&self, args: &Value) -> Result<Value> {
        let args: SecurityArgs = parse_args(args)?;
        let threshold: Severity = args
            .severity_threshold
            .parse()
            .unwrap_or(Severity::Low);
        let mut issues = SecurityAnalyzer::new().analyze(&args.symbols);
        issues.retain(|i| i.severity.rank() >= threshold.rank());

        let count_of = |severity: Severity| {
            issues.iter().filter(|i| i.severity == severity).count()
        };
        Ok(json!({
            "total_found": issues.len(),
            "severity_threshold": args.severity_threshold,
            "severity_counts": {
                "critical": count_of(Severity::Critical),
                "high": count_of(Severity::High),
                "medium": count_of(Severity::Medium),
                "low": count_of(Severity::Low),
            },
            "issues": issues
                .iter()
                .take(self.config.max_suggestions)
                .collect::<Vec<_>>(),
        }))
    }

    fn smart_tests_generate(&self, args: &Value) -> Result<Value> {
        let args: SmartArgs = parse_args(args)?;
        // Generation failures are reported as data, not as a dispatch error.
        match SmartPytestFileGenerator::new().generate_tests_for_file(Path::new(&args.file_path)) {
            Ok(code) => Ok(json!({
                "success": true,
                "file_path": args.file_path,
                "lines": code.lines().count(),
                "test_code": code,
            })),
            Err(err) => Ok(json!({
                "success": false,
                "file_path": args.file_path,
                "error": err.to_string(),
            })),
        }
    }

    fn brain_stats(&self) -> Result<Value> {
        Ok(json!({
            "server_name": self.config.server_name,
            "server_version": self.config.server_version,
            "tools_available": TOOL_NAMES.len(),
            "min_gap_support": self.config.min_gap_support,
            "min_confidence": self.config.min_confidence,
            "max_suggestions": self.config.max_suggestions,
            "default_test_framework": self.config.default_test_framework,
        }))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: &Value) -> Result<T> {
    serde_json::from_value(args.clone()).map_err(|e| anyhow::anyhow!("invalid arguments: {}", e))
}
