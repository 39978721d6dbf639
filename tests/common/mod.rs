//! Shared helpers for integration tests.

use devbrain::CodeSymbol;

/// Lift top-level functions and classes out of a Python source file into
/// symbol records, keeping each definition's body text and docstring.
pub fn symbols_from_python(source: &str, file_path: &str) -> Vec<CodeSymbol> {
    let lines: Vec<&str> = source.lines().collect();
    let mut symbols = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let (name, symbol_type) = if let Some(rest) = line.strip_prefix("def ") {
            (def_name(rest), "function")
        } else if let Some(rest) = line.strip_prefix("async def ") {
            (def_name(rest), "function")
        } else if let Some(rest) = line.strip_prefix("class ") {
            (def_name(rest), "class")
        } else {
            index += 1;
            continue;
        };

        let start = index;
        index += 1;
        while index < lines.len() {
            let body_line = lines[index];
            let ends_block = !body_line.trim().is_empty()
                && !body_line.starts_with(' ')
                && !body_line.starts_with('\t');
            if ends_block {
                break;
            }
            index += 1;
        }

        symbols.push(CodeSymbol {
            name,
            symbol_type: symbol_type.to_string(),
            file_path: file_path.to_string(),
            line: (start + 1) as u64,
            docstring: extract_docstring(&lines[start + 1..index]),
            source_code: Some(lines[start..index].join("\n")),
        });
    }

    symbols
}

fn def_name(rest: &str) -> String {
    rest.split(|c| c == '(' || c == ':')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

fn extract_docstring(body: &[&str]) -> Option<String> {
    let first = body.iter().position(|l| !l.trim().is_empty())?;
    let opening = body[first].trim();
    let rest = opening.strip_prefix("\"\"\"")?;

    if let Some(end) = rest.find("\"\"\"") {
        return Some(rest[..end].to_string());
    }

    let mut doc = vec![rest.to_string()];
    for line in &body[first + 1..] {
        match line.find("\"\"\"") {
            Some(end) => {
                doc.push(line[..end].trim().to_string());
                return Some(doc.join("\n"));
            }
            None => doc.push(line.trim().to_string()),
        }
    }
    None
}
