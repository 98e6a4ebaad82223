//! Top-level field extraction.

use std::sync::LazyLock;

use rbxjson_tokenizer::Span;
use regex::Regex;
use serde_json::{Map, Value};

use crate::node::{Node, NodeKind};
use crate::parser::{Parse, ParseError, parse};

static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""className"\s*:\s*"([^"]*)""#).unwrap());

/// The typed top-level fields of an rbxjson document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub class_name: Option<String>,
    pub name: Option<String>,
    pub properties: Map<String, Value>,
    pub attributes: Map<String, Value>,
    pub tags: Vec<String>,
    pub parse_errors: Vec<ParseError>,
}

impl ParsedDocument {
    /// Whether `properties` already holds `name` with an object value.
    pub fn has_object_property(&self, name: &str) -> bool {
        self.properties.get(name).is_some_and(Value::is_object)
    }
}

/// Parse `source` and extract its top-level fields.
pub fn extract_top_level(source: &str) -> ParsedDocument {
    extract_from(&parse(source), source)
}

/// Extract top-level fields from an existing parse of `source`.
///
/// Only direct children of the root object are considered, and a value of
/// the wrong shape for its key is ignored. When the tree has no usable
/// `className`, it is recovered textually.
pub fn extract_from(parse: &Parse, source: &str) -> ParsedDocument {
    let mut doc = ParsedDocument {
        parse_errors: parse.errors.clone(),
        ..Default::default()
    };

    if let Some(root) = parse.root.as_ref().filter(|root| root.is_object()) {
        for property in root.properties() {
            let Some(value) = &property.value else {
                continue;
            };
            match (property.key_text(), &value.kind) {
                ("className", NodeKind::String(s)) => doc.class_name = Some(s.clone()),
                ("name", NodeKind::String(s)) => doc.name = Some(s.clone()),
                ("properties", NodeKind::Object(_)) => doc.properties = object_map(value),
                ("attributes", NodeKind::Object(_)) => doc.attributes = object_map(value),
                ("tags", NodeKind::Array(items)) => {
                    doc.tags = items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect();
                }
                _ => {}
            }
        }
    }

    if doc.class_name.is_none() {
        doc.class_name = class_name_from_text(source);
    }

    doc
}

/// Recover `className` with a textual match.
pub fn class_name_from_text(source: &str) -> Option<String> {
    CLASS_NAME_RE
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn object_map(node: &Node) -> Map<String, Value> {
    match node.to_json() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Name and key span (quotes excluded) of each entry under `properties`.
pub fn find_property_ranges(root: &Node) -> Vec<(String, Span)> {
    let Some(properties) = root.child_by_key("properties") else {
        return Vec::new();
    };
    properties
        .properties()
        .map(|p| (p.key_text().to_string(), content_span(&p.key)))
        .collect()
}

/// Span of the `className` string's contents (quotes excluded).
pub fn find_class_name_span(root: &Node) -> Option<Span> {
    root.child_by_key("className")
        .filter(|node| node.is_string())
        .map(content_span)
}

/// The span of a string node without its quotes.
pub fn content_span(node: &Node) -> Span {
    let start = (node.span.start + 1).min(node.span.end);
    let end = if node.closed {
        node.span.end.saturating_sub(1).max(start)
    } else {
        node.span.end
    };
    Span::new(start, end)
}
