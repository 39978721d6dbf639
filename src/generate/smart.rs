//! Whole-file pytest generation.
//!
//! Scans a Python source file line by line for top-level functions, classes
//! with their public methods, and imports, then renders a pytest file with
//! one skeleton test per callable. Async defs get `@pytest.mark.asyncio`;
//! third-party imports get a mock hint in the file header.

use std::path::Path;

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("expected a .py source file, got: {0}")]
    WrongExtension(String),
    #[error("failed to parse {file}: malformed definition at line {line}")]
    Parse { file: String, line: usize },
    #[error("failed to read source file")]
    Io(#[from] std::io::Error),
}

lazy_static! {
    static ref DEF_FULL: Regex = Regex::new(
        r"^(\s*)(async\s+)?def\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(?:->\s*([^:]+))?:"
    )
    .unwrap();
    static ref DEF_START: Regex = Regex::new(r"^\s*(async\s+)?def\b").unwrap();
    static ref CLASS_DEF: Regex = Regex::new(r"^class\s+([A-Za-z_]\w*)").unwrap();
    static ref DECORATOR_LINE: Regex = Regex::new(r"^\s*@([A-Za-z_][\w.]*)").unwrap();
    static ref IMPORT_LINE: Regex =
        Regex::new(r"^(?:from\s+([A-Za-z_][\w.]*)\s+import|import\s+([A-Za-z_][\w.]*))").unwrap();
}

/// Modules shipped with CPython. Imports of these never need a mock.
static PY_STDLIB: phf::Set<&'static str> = phf_set! {
    "abc", "asyncio", "collections", "contextlib", "copy", "csv", "dataclasses",
    "datetime", "enum", "functools", "hashlib", "http", "io", "itertools",
    "json", "logging", "math", "os", "pathlib", "pickle", "random", "re",
    "shutil", "socket", "sqlite3", "string", "struct", "subprocess", "sys",
    "tempfile", "textwrap", "threading", "time", "traceback", "types",
    "typing", "unittest", "urllib", "uuid", "warnings",
};

/// Third-party modules whose clients are awaited, so they need AsyncMock.
static ASYNC_LIBS: phf::Set<&'static str> = phf_set! {
    "aioboto3", "aiofiles", "aiohttp", "aiokafka", "aioredis", "asyncpg",
    "httpx", "motor",
};

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_annotation: Option<String>,
    pub decorators: Vec<String>,
    pub is_async: bool,
    pub line: usize,
}

impl FunctionInfo {
    fn is_property(&self) -> bool {
        self.decorators.iter().any(|d| d == "property")
    }
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub methods: Vec<FunctionInfo>,
    pub is_dataclass: bool,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct ImportInfo {
    pub module: String,
}

#[derive(Debug, Default)]
pub struct ModuleInfo {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
}

/// Maps imported modules to the mock they need in tests.
#[derive(Default)]
pub struct MockDetector;

impl MockDetector {
    pub fn new() -> Self {
        MockDetector
    }

    /// The mock expression for a module, or None for stdlib imports.
    pub fn mock_for_import(&self, module: &str) -> Option<String> {
        let root = module.split('.').next().unwrap_or(module);
        if PY_STDLIB.contains(root) {
            return None;
        }
        if ASYNC_LIBS.contains(root) {
            Some(format!("AsyncMock(spec={})", root))
        } else {
            Some(format!("MagicMock(spec={})", root))
        }
    }
}

/// Scan a Python source file into its callable surface.
///
/// Signatures may span several lines; the header is joined until its
/// parentheses balance. A header that still does not scan as a def is
/// treated as a parse failure rather than silently skipped.
pub fn parse_python_module(source: &str, file: &str) -> Result<ModuleInfo, GenerateError> {
    let mut module = ModuleInfo::default();
    let mut current_class: Option<ClassInfo> = None;
    let mut decorators: Vec<String> = Vec::new();

    let lines: Vec<&str> = source.lines().collect();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        let line_no = index + 1;
        index += 1;

        if let Some(caps) = DECORATOR_LINE.captures(line) {
            decorators.push(caps[1].to_string());
            continue;
        }

        if let Some(caps) = IMPORT_LINE.captures(line) {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
            if let Some(name) = name {
                module.imports.push(ImportInfo { module: name });
            }
            continue;
        }

        if let Some(caps) = CLASS_DEF.captures(line) {
            if let Some(done) = current_class.take() {
                module.classes.push(done);
            }
            let is_dataclass = decorators
                .drain(..)
                .any(|d| d == "dataclass" || d.ends_with(".dataclass"));
            current_class = Some(ClassInfo {
                name: caps[1].to_string(),
                methods: Vec::new(),
                is_dataclass,
                line: line_no,
            });
            continue;
        }

        if DEF_START.is_match(line) {
            let mut header = line.to_string();
            while paren_balance(&header) > 0 && index < lines.len() {
                header.push(' ');
                header.push_str(lines[index].trim());
                index += 1;
            }
            let caps = DEF_FULL
                .captures(&header)
                .ok_or_else(|| GenerateError::Parse {
                    file: file.to_string(),
                    line: line_no,
                })?;
            let indent = caps[1].len();
            let info = FunctionInfo {
                name: caps[3].to_string(),
                params: parse_params(&caps[4]),
                return_annotation: caps.get(5).map(|m| m.as_str().trim().to_string()),
                decorators: std::mem::take(&mut decorators),
                is_async: caps.get(2).is_some(),
                line: line_no,
            };

            if indent == 0 {
                if let Some(done) = current_class.take() {
                    module.classes.push(done);
                }
                module.functions.push(info);
            } else if let Some(class) = current_class.as_mut() {
                class.methods.push(info);
            }
            continue;
        }

        // Any other statement orphans pending decorators.
        if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
            decorators.clear();
        }

        // Any other top-level statement also ends the current class body.
        if !line.trim().is_empty()
            && !line.starts_with(|c: char| c.is_whitespace())
            && !line.starts_with('#')
        {
            if let Some(done) = current_class.take() {
                module.classes.push(done);
            }
        }
    }

    if let Some(done) = current_class.take() {
        module.classes.push(done);
    }
    Ok(module)
}

fn paren_balance(text: &str) -> i32 {
    text.chars().fold(0, |acc, c| match c {
        '(' => acc + 1,
        ')' => acc - 1,
        _ => acc,
    })
}

fn parse_params(raw: &str) -> Vec<Parameter> {
    raw.split(',')
        .map(|p| {
            p.split(':')
                .next()
                .unwrap_or("")
                .split('=')
                .next()
                .unwrap_or("")
                .trim()
                .trim_start_matches('*')
                .to_string()
        })
        .filter(|name| !name.is_empty() && name != "self" && name != "cls")
        .map(|name| Parameter { name })
        .collect()
}

#[derive(Default)]
pub struct SmartPytestFileGenerator {
    mocks: MockDetector,
}

/// Earlier tooling exposed the generator under this name as well.
pub type SmartTestFileGenerator = SmartPytestFileGenerator;

impl SmartPytestFileGenerator {
    pub fn new() -> Self {
        SmartPytestFileGenerator::default()
    }

    /// Read and scan a `.py` file, then render a full pytest file for it.
    pub fn generate_tests_for_file(&self, path: &Path) -> Result<String, GenerateError> {
        if !path.exists() {
            return Err(GenerateError::FileNotFound(path.display().to_string()));
        }
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            return Err(GenerateError::WrongExtension(path.display().to_string()));
        }
        let source = std::fs::read_to_string(path)?;
        let module_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("module")
            .to_string();
        let module = parse_python_module(&source, &path.display().to_string())?;
        Ok(self.render(&module_name, &module))
    }

    fn render(&self, module_name: &str, module: &ModuleInfo) -> String {
        let mut out = String::new();
        out.push_str(&format!("\"\"\"Tests for {}.\"\"\"\n\n", module_name));
        out.push_str("import pytest\n");

        let mocks: Vec<(String, String)> = module
            .imports
            .iter()
            .filter_map(|i| {
                self.mocks
                    .mock_for_import(&i.module)
                    .map(|m| (i.module.clone(), m))
            })
            .collect();
        let needs_async_mock = mocks.iter().any(|(_, m)| m.starts_with("AsyncMock"));
        if !mocks.is_empty() {
            if needs_async_mock {
                out.push_str("from unittest.mock import AsyncMock, MagicMock, patch\n");
            } else {
                out.push_str("from unittest.mock import MagicMock, patch\n");
            }
        }

        let mut names: Vec<String> = module.functions.iter().map(|f| f.name.clone()).collect();
        names.extend(module.classes.iter().map(|c| c.name.clone()));
        if !names.is_empty() {
            out.push_str(&format!(
                "\nfrom {} import {}\n",
                module_name,
                names.join(", ")
            ));
        }

        for (import_name, mock) in &mocks {
            out.push_str(&format!("\n# mock '{}' with {}\n", import_name, mock));
        }

        for function in &module.functions {
            out.push('\n');
            out.push_str(&self.render_function_test(function, None));
        }

        for class in &module.classes {
            let what = if class.is_dataclass {
                format!("the {} dataclass", class.name)
            } else {
                class.name.clone()
            };
            out.push_str(&format!(
                "\n\nclass Test{}:\n    \"\"\"Tests for {}.\"\"\"\n",
                class.name, what
            ));
            for method in class.methods.iter().filter(|m| !m.name.starts_with('_')) {
                out.push('\n');
                for line in self.render_function_test(method, Some(&class.name)).lines() {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&format!("    {}\n", line));
                    }
                }
            }
        }

        out
    }

    fn render_function_test(&self, function: &FunctionInfo, class: Option<&str>) -> String {
        let mut out = String::new();
        let self_arg = if class.is_some() { "self" } else { "" };

        if function.is_async {
            out.push_str("@pytest.mark.asyncio\n");
            out.push_str(&format!("async def test_{}({}):\n", function.name, self_arg));
        } else {
            out.push_str(&format!("def test_{}({}):\n", function.name, self_arg));
        }
        let summary = if function.is_property() {
            "exposes a value"
        } else {
            "returns a result for valid input"
        };
        out.push_str(&format!("    \"\"\"{} {}.\"\"\"\n", function.name, summary));

        // Properties are read as attributes, never called.
        if function.is_property() {
            if let Some(class_name) = class {
                out.push_str(&format!("    instance = {}()\n", class_name));
                out.push_str(&format!("    result = instance.{}\n", function.name));
                out.push_str("    assert result is not None\n");
                return out;
            }
        }

        for param in &function.params {
            out.push_str(&format!("    {} = None  # TODO: provide a value\n", param.name));
        }

        let args = function
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let call = match class {
            Some(class_name) => {
                out.push_str(&format!("    instance = {}()\n", class_name));
                format!("instance.{}({})", function.name, args)
            }
            None => format!("{}({})", function.name, args),
        };
        if function.is_async {
            out.push_str(&format!("    result = await {}\n", call));
        } else {
            out.push_str(&format!("    result = {}\n", call));
        }
        if function.return_annotation.as_deref() == Some("None") {
            out.push_str("    assert result is None\n");
        } else {
            out.push_str("    assert result is not None\n");
        }
        out
    }
}
