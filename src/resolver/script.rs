//! Python source sent to the resolver
//!
//! Raw input is embedded only as a JSON string literal (valid Python string
//! syntax), never spliced into code. Interpretation of the input, including
//! `int()` parsing for PDG IDs, happens inside the script so that bad input
//! fails through the resolver's own error path.

use crate::types::{Query, SearchMode};

/// Probe run once during initialization; prints the package version
pub const PROBE_SCRIPT: &str = "import particle\nprint(particle.__version__)\n";

/// Name of the variable that holds the JSON answer after [`resolve_script`] runs
pub const RESULT_VARIABLE: &str = "result";

/// Build the script answering `query`
///
/// After execution the module-level variable [`RESULT_VARIABLE`] holds a
/// JSON document: either the particle record or `{"error": "..."}`.
pub fn resolve_script(query: &Query) -> String {
    let raw = python_string_literal(&query.raw_input);
    let lookup = match query.mode {
        SearchMode::PdgId => "Particle.from_pdgid(int(raw))",
        SearchMode::Name => "Particle.from_name(raw)",
    };

    format!(
        r#"import json
from particle import Particle

raw = {raw}
try:
    found = {lookup}
    output = {{
        "name": found.name,
        "pdg_id": int(found.pdgid),
        "mass": found.mass,
        "width": found.width,
    }}
except Exception as exc:
    output = {{"error": "%s: %s" % (type(exc).__name__, exc)}}
{result} = json.dumps(output)
"#,
        raw = raw,
        lookup = lookup,
        result = RESULT_VARIABLE,
    )
}

/// Script for a standalone interpreter: same as [`resolve_script`] plus a print
pub fn printing_script(query: &Query) -> String {
    let mut script = resolve_script(query);
    script.push_str(&format!("print({})\n", RESULT_VARIABLE));
    script
}

/// Quote `text` as a Python string literal
///
/// JSON string escapes (`\"`, `\\`, `\n`, `\uXXXX`) are a subset of Python's.
fn python_string_literal(text: &str) -> String {
    // Serializing a &str to JSON cannot fail
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdgid_script_parses_inside_python() {
        let script = resolve_script(&Query::new(SearchMode::PdgId, "-11"));
        assert!(script.contains(r#"raw = "-11""#));
        assert!(script.contains("Particle.from_pdgid(int(raw))"));
        assert!(script.contains("result = json.dumps(output)"));
    }

    #[test]
    fn test_name_script() {
        let script = resolve_script(&Query::new(SearchMode::Name, "pi+"));
        assert!(script.contains(r#"raw = "pi+""#));
        assert!(script.contains("Particle.from_name(raw)"));
    }

    #[test]
    fn test_input_cannot_escape_literal() {
        let hostile = "11)\nimport os; os.system(\"rm -rf /\")  # \"";
        let script = resolve_script(&Query::new(SearchMode::PdgId, hostile));

        // The whole input sits on the `raw = ...` line, newline escaped
        let raw_line = script
            .lines()
            .find(|line| line.starts_with("raw = "))
            .unwrap();
        assert!(raw_line.contains(r#"\n"#));
        assert!(raw_line.contains(r#"\"rm -rf /\""#));
        assert!(!script.lines().any(|line| line.starts_with("import os")));
    }

    #[test]
    fn test_empty_input_is_not_short_circuited() {
        let script = resolve_script(&Query::new(SearchMode::PdgId, "   "));
        assert!(script.contains(r#"raw = "   ""#));
    }

    #[test]
    fn test_printing_script_prints_result() {
        let script = printing_script(&Query::new(SearchMode::Name, "e-"));
        assert!(script.trim_end().ends_with("print(result)"));
    }
}
