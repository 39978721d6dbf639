//! Test synthesis: gap templates and whole-file pytest generation.

pub mod smart;

pub use gap_tests::{CodeTestGenerator, TestGenerator, TEMPLATES};
pub use smart::{
    GenerateError, MockDetector, SmartPytestFileGenerator, SmartTestFileGenerator,
};
