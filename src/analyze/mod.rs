//! Heuristic analyzers over pre-extracted code facts.

pub mod behavior;
pub mod coverage;
pub mod docs;
pub mod input;
pub mod refactor;
pub mod security;
pub mod types;
pub mod ux;

pub use behavior::BehaviorAnalyzer;
pub use coverage::CoverageAnalyzer;
pub use docs::DocsAnalyzer;
pub use input::{BehaviorPattern, CodeSymbol};
pub use refactor::RefactorAnalyzer;
pub use security::SecurityAnalyzer;
pub use types::{
    CoverageGap, DocSuggestion, GeneratedTest, MissingBehavior, Priority, RefactorSuggestion,
    SecurityIssue, Severity, SuggestedUnitCase, TestSuggestion, UXInsight,
};
pub use ux::UXAnalyzer;
