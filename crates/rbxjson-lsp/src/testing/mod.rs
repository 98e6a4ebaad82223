//! Test support: a small fixture schema, a cursor-marker harness and a
//! snippet expander.

mod harness;

pub use harness::{Cursor, TestDocument, context_at};

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::MemorySchema;

const FIXTURE_SCHEMA: &str = include_str!("fixture_schema.json");

/// A schema with a handful of classes (Instance → PVInstance → BasePart →
/// Part, Model, Folder, Script, Frame, Sound) and two enums.
pub fn fixture_schema() -> MemorySchema {
    MemorySchema::from_json_str(FIXTURE_SCHEMA).expect("fixture schema is valid")
}

static TABSTOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\d+\|([^,|}]*)[^}]*\}|\$\{\d+:((?:\\.|[^\\}])*)\}|\$\{\d+\}|\$\d+").unwrap()
});

/// Expand a snippet the way an editor would when every placeholder is
/// accepted unchanged: choices take their first option, placeholders their
/// default text, bare tab stops become empty.
pub fn expand_snippet(snippet: &str) -> String {
    let expanded = TABSTOP_RE.replace_all(snippet, |caps: &regex::Captures<'_>| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    });
    let mut out = String::with_capacity(expanded.len());
    let mut chars = expanded.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_snippet() {
        assert_eq!(expand_snippet("${1|true,false|}"), "true");
        assert_eq!(expand_snippet("\"${1:Part}\""), "\"Part\"");
        assert_eq!(expand_snippet("[${1}] $0"), "[] ");
        assert_eq!(expand_snippet(r"${1:a\}b} \$x"), "a}b $x");
    }
}
