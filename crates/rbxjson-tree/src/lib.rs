//! Syntax tree for rbxjson documents.
//!
//! [`parse`] turns possibly-broken source text into a best-effort [`Node`]
//! tree plus a list of [`ParseError`]s. [`extract_top_level`] pulls the typed
//! top-level fields (`className`, `name`, `properties`, `attributes`,
//! `tags`) out of a document.

mod document;
mod node;
mod parser;

pub use document::{
    ParsedDocument, class_name_from_text, content_span, extract_from, extract_top_level,
    find_class_name_span, find_property_ranges,
};
pub use node::{Location, Node, NodeKind, PathSegment, Property};
pub use parser::{Parse, ParseError, parse};
pub use rbxjson_tokenizer::Span;
