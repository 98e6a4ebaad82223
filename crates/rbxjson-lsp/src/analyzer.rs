//! Cursor context classification.
//!
//! [`classify`] maps a byte offset in an rbxjson buffer to exactly one
//! [`ContextKind`] plus the metadata the completion generator needs. It runs
//! in two stages: a lexical check for empty `"enumType":` / `"value":` slots
//! ([`crate::lookahead`]), then a dispatch on the key path from the root to
//! the node under the cursor.

use std::fmt;
use std::sync::LazyLock;

use rbxjson_tree::{Location, Node, NodeKind, Parse, ParsedDocument, PathSegment, Span};
use regex::Regex;
use tracing::debug;

use crate::lookahead::{self, Slot, SlotMatch};
use crate::tables::{self, StructTarget};

/// How far past the cursor the new-key heuristic looks for a colon.
const COLON_LOOKAHEAD: usize = 20;

static COLON_AFTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:\s*["']?\s*:|[^"'\n]*["']?\s*:)"#).unwrap());

/// What the cursor is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// A key of the root object.
    RootKey,
    /// The `className` value.
    ClassName,
    /// A key directly under `properties`.
    PropertyKey,
    /// A field key inside a property object (`type`, `value`).
    PropertyValueKey,
    /// A field key inside an enum value object (`enumType`, `value`).
    EnumValueKey,
    /// A field key inside a struct value object.
    StructFieldKey,
    /// A property's `type` value.
    TypeField,
    /// A property's `originalType` value.
    OriginalTypeField,
    /// A property's `value`.
    ValueField,
    /// Inside an object or array where the declared type wants a scalar.
    WrongValueStructure,
    /// The `enumType` of an enum value.
    EnumType,
    /// The `value` of an enum value.
    EnumValue,
    /// A numeric leaf of a struct value.
    VectorField,
    /// A key under `attributes`.
    AttributeKey,
    /// A value under `attributes`.
    AttributeValue,
    /// An element of `tags`.
    Tag,
    Unknown,
}

impl ContextKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextKind::RootKey => "rootKey",
            ContextKind::ClassName => "className",
            ContextKind::PropertyKey => "propertyKey",
            ContextKind::PropertyValueKey => "propertyValueKey",
            ContextKind::EnumValueKey => "enumValueKey",
            ContextKind::StructFieldKey => "structFieldKey",
            ContextKind::TypeField => "typeField",
            ContextKind::OriginalTypeField => "originalTypeField",
            ContextKind::ValueField => "valueField",
            ContextKind::WrongValueStructure => "wrongValueStructure",
            ContextKind::EnumType => "enumType",
            ContextKind::EnumValue => "enumValue",
            ContextKind::VectorField => "vectorField",
            ContextKind::AttributeKey => "attributeKey",
            ContextKind::AttributeValue => "attributeValue",
            ContextKind::Tag => "tag",
            ContextKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classified cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContext {
    pub kind: ContextKind,
    /// `className` of the document, from the tree or recovered textually.
    pub class_name: Option<String>,
    /// The property under `properties` the cursor is in.
    pub property_name: Option<String>,
    /// The `type` tag written on that property.
    pub property_type: Option<String>,
    /// The `enumType` written next to an enum `value`.
    pub enum_type: Option<String>,
    /// The struct whose field keys are being typed, for nested structs.
    pub struct_type: Option<&'static str>,
    /// Keys and indices from the root to the cursor.
    pub path: Vec<PathSegment>,
    /// Text typed so far.
    pub prefix: String,
    /// Span a completion replaces: a string's contents, or the prefix.
    pub range: Span,
    /// Like `range` but including the quotes of a string token.
    pub token_range: Span,
    pub inside_quote: bool,
    /// Span of the whole `value` node, for structure repairs.
    pub value_range: Option<Span>,
    /// Properties already present, excluding the one being typed.
    pub existing_properties: Vec<String>,
}

impl DocumentContext {
    fn new(kind: ContextKind, offset: u32) -> Self {
        Self {
            kind,
            class_name: None,
            property_name: None,
            property_type: None,
            enum_type: None,
            struct_type: None,
            path: Vec::new(),
            prefix: String::new(),
            range: Span::empty(offset),
            token_range: Span::empty(offset),
            inside_quote: false,
            value_range: None,
            existing_properties: Vec::new(),
        }
    }

    fn path_key(&self, index: usize) -> Option<&str> {
        self.path.get(index).and_then(PathSegment::as_key)
    }
}

/// Parse `text` and classify `offset`.
pub fn analyze(text: &str, offset: usize) -> DocumentContext {
    classify(text, &rbxjson_tree::parse(text), offset)
}

/// Classify `offset` in `text`, given its parse.
///
/// Total: every input yields a context, falling back to
/// [`ContextKind::RootKey`] when there is no tree to look at and to
/// [`ContextKind::Unknown`] for positions with no completion strategy.
pub fn classify(text: &str, parse: &Parse, offset: usize) -> DocumentContext {
    let offset = floor_char_boundary(text, offset);
    let offset32 = offset as u32;
    let doc = rbxjson_tree::extract_from(parse, text);

    let mut ctx = DocumentContext::new(ContextKind::RootKey, offset32);
    ctx.class_name = doc.class_name.clone();

    let Some(root) = &parse.root else {
        debug!(offset, "no tree, offering root keys");
        ctx.prefix = word_before(text, offset).to_string();
        ctx.range = Span::new(offset32 - ctx.prefix.len() as u32, offset32);
        ctx.token_range = ctx.range;
        return ctx;
    };
    let Some(location) = root.locate(offset32) else {
        debug!(offset, "offset outside the tree, offering root keys");
        return ctx;
    };

    ctx.path = location.path.clone();
    fill_prefix(&mut ctx, text, offset, location.node);

    let classifier = Classifier {
        text,
        root,
        doc: &doc,
        location: &location,
        offset: offset32,
    };

    if let Some(hit) = lookahead::detect(text, offset)
        && classifier.apply_slot(&mut ctx, &hit)
    {
        debug!(
            kind = %ctx.kind,
            property = ?ctx.property_name,
            ty = ?ctx.property_type,
            "classified from lexical slot"
        );
        return ctx;
    }

    classifier.classify_path(&mut ctx);
    debug!(
        kind = %ctx.kind,
        path = ?ctx.path,
        property = ?ctx.property_name,
        ty = ?ctx.property_type,
        prefix = %ctx.prefix,
        "classified"
    );
    ctx
}

struct Classifier<'a> {
    text: &'a str,
    root: &'a Node,
    doc: &'a ParsedDocument,
    location: &'a Location<'a>,
    offset: u32,
}

impl Classifier<'_> {
    /// Apply a lexically detected slot. Returns false when the tree path
    /// shows the slot belongs to something the path dispatch handles better.
    fn apply_slot(&self, ctx: &mut DocumentContext, hit: &SlotMatch) -> bool {
        let path = &self.location.path;
        let in_properties = ctx.path_key(0) == Some("properties");
        if !(path.is_empty() || in_properties) || path.len() > 4 {
            return false;
        }

        let property = ctx
            .path_key(1)
            .filter(|_| in_properties)
            .map(str::to_string)
            .or_else(|| match hit.enclosing_key.as_deref() {
                Some("value") => hit.owning_property.clone(),
                Some(key) => Some(key.to_string()),
                None => None,
            });
        let property_type = property
            .as_deref()
            .and_then(|p| self.property_type(p))
            .map(str::to_string);

        let in_value_object = if path.len() >= 3 {
            ctx.path_key(2) == Some("value")
        } else {
            hit.is_nested_in_value()
        };
        let nested_in_value = in_value_object && (path.len() < 3 || path.len() == 4);
        let declared_non_enum = property_type.as_deref().is_some_and(|ty| ty != "Enum");

        let kind = match hit.slot {
            Slot::EnumType if in_value_object && declared_non_enum => return false,
            Slot::EnumType => ContextKind::EnumType,
            Slot::Value if nested_in_value => {
                if declared_non_enum {
                    return false;
                }
                ctx.enum_type = property
                    .as_deref()
                    .and_then(|p| self.enum_type(p))
                    .map(str::to_string)
                    .or_else(|| hit.sibling_enum_type.clone());
                ContextKind::EnumValue
            }
            Slot::Value if path.len() > 3 => return false,
            Slot::Value => ContextKind::ValueField,
        };

        ctx.kind = kind;
        ctx.property_name = property;
        ctx.property_type = property_type;
        ctx.prefix = hit.word.clone();
        ctx.range = Span::new(self.offset - hit.word.len() as u32, self.offset);
        ctx.token_range = ctx.range;
        ctx.inside_quote = false;
        true
    }

    fn classify_path(&self, ctx: &mut DocumentContext) {
        let on_key = self.location.on_key;
        let first = ctx.path.first().cloned();
        let len = ctx.path.len();

        ctx.kind = match first.as_ref().and_then(PathSegment::as_key) {
            None if len == 0 => ContextKind::RootKey,
            _ if len == 1 && on_key => ContextKind::RootKey,
            Some("className") if len == 1 => ContextKind::ClassName,
            Some("properties") => return self.classify_properties(ctx),
            Some("attributes") => match len {
                1 => ContextKind::AttributeKey,
                2 if on_key => ContextKind::AttributeKey,
                _ => ContextKind::AttributeValue,
            },
            Some("tags") => ContextKind::Tag,
            Some(_) if len == 1 => ContextKind::RootKey,
            _ => ContextKind::Unknown,
        };
    }

    fn classify_properties(&self, ctx: &mut DocumentContext) {
        let len = ctx.path.len();
        let on_key = self.location.on_key;

        if len == 1 {
            ctx.kind = ContextKind::PropertyKey;
            ctx.existing_properties = self.existing_properties();
            return;
        }

        let Some(property) = ctx.path_key(1).map(str::to_string) else {
            ctx.kind = ContextKind::Unknown;
            return;
        };

        if property.is_empty() {
            ctx.kind = ContextKind::PropertyKey;
            ctx.existing_properties = self.existing_properties();
            return;
        }

        if len == 2 {
            // Best effort: a key typed mid-document that matches an existing
            // sibling, or that already has a colon after it, reads as that
            // property's object.
            let colon_after = COLON_AFTER_RE.is_match(self.text_after());
            if colon_after || self.doc.has_object_property(&property) {
                ctx.kind = ContextKind::PropertyValueKey;
                ctx.property_name = Some(property);
            } else {
                ctx.kind = ContextKind::PropertyKey;
                ctx.existing_properties = self.existing_properties();
            }
            return;
        }

        ctx.property_name = Some(property.clone());

        if len == 3 && on_key {
            ctx.kind = ContextKind::PropertyValueKey;
            return;
        }

        ctx.kind = match ctx.path_key(2) {
            Some("type") => ContextKind::TypeField,
            Some("originalType") => ContextKind::OriginalTypeField,
            Some("value") => return self.classify_value(ctx, &property),
            _ => ContextKind::PropertyValueKey,
        };
    }

    /// Classify a position at or below `properties → P → value`.
    fn classify_value(&self, ctx: &mut DocumentContext, property: &str) {
        let on_key = self.location.on_key;
        let rest: Vec<PathSegment> = ctx.path[3..].to_vec();
        let property_type = self.property_type(property).map(str::to_string);
        let value_node = self.value_node(property);
        let value_is_container = value_node.is_some_and(|v| v.is_object() || v.is_array());
        ctx.property_type = property_type.clone();

        let Some(ty) = property_type.as_deref() else {
            ctx.kind = self.untyped_value(&rest, property);
            if ctx.kind == ContextKind::EnumValue {
                ctx.enum_type = self.enum_type(property).map(str::to_string);
            }
            return;
        };

        if tables::is_primitive(ty) {
            ctx.value_range = value_node.map(|v| v.span);
            let inside_container = value_node.is_some_and(|v| {
                value_is_container
                    && self.offset > v.span.start
                    && (self.offset < v.span.end || !v.closed)
            });
            if !rest.is_empty() || inside_container {
                ctx.kind = ContextKind::WrongValueStructure;
                ctx.prefix.clear();
                ctx.range = Span::empty(self.offset);
                ctx.token_range = ctx.range;
                ctx.inside_quote = false;
            } else {
                ctx.kind = ContextKind::ValueField;
            }
            return;
        }

        if ty == "Enum" {
            ctx.kind = match rest.first().and_then(PathSegment::as_key) {
                None => ContextKind::EnumValueKey,
                Some(_) if on_key && rest.len() == 1 => ContextKind::EnumValueKey,
                Some("enumType") => ContextKind::EnumType,
                Some("value") => {
                    ctx.enum_type = self.enum_type(property).map(str::to_string);
                    ContextKind::EnumValue
                }
                Some(_) => ContextKind::EnumValueKey,
            };
            return;
        }

        if tables::is_struct(ty) {
            if rest.is_empty() {
                ctx.kind = ContextKind::StructFieldKey;
                ctx.struct_type = tables::struct_layout(ty).map(|(name, _)| name);
                return;
            }

            let within = if on_key {
                &rest[..rest.len() - 1]
            } else {
                &rest[..]
            };
            ctx.kind = match tables::resolve_struct_path(ty, within) {
                StructTarget::Struct(name) => {
                    ctx.struct_type = Some(name);
                    ContextKind::StructFieldKey
                }
                StructTarget::Leaf => ContextKind::VectorField,
                StructTarget::Unknown if rest.len() == 1 => ContextKind::VectorField,
                StructTarget::Unknown => ContextKind::StructFieldKey,
            };
            return;
        }

        ctx.kind = self.untyped_value(&rest, property);
        if ctx.kind == ContextKind::EnumValue {
            ctx.enum_type = self.enum_type(property).map(str::to_string);
        }
    }

    /// Key-name matching for a value whose type is missing or unrecognized.
    fn untyped_value(&self, rest: &[PathSegment], property: &str) -> ContextKind {
        match rest.first().and_then(PathSegment::as_key) {
            Some("enumType") => ContextKind::EnumType,
            Some("value") if rest.len() == 1 && self.enum_type(property).is_some() => {
                ContextKind::EnumValue
            }
            _ => ContextKind::ValueField,
        }
    }

    fn property_type(&self, property: &str) -> Option<&str> {
        self.root.lookup_str(&["properties", property, "type"])
    }

    fn enum_type(&self, property: &str) -> Option<&str> {
        self.root
            .lookup_str(&["properties", property, "value", "enumType"])
    }

    fn value_node(&self, property: &str) -> Option<&Node> {
        self.root.lookup(&["properties", property, "value"])
    }

    fn existing_properties(&self) -> Vec<String> {
        let Some(properties) = self.root.child_by_key("properties") else {
            return Vec::new();
        };
        let NodeKind::Object(children) = &properties.kind else {
            return Vec::new();
        };
        children
            .iter()
            .filter(|child| !child.span.contains(self.offset, true))
            .filter_map(Node::as_property)
            .map(|p| p.key_text().to_string())
            .collect()
    }

    fn text_after(&self) -> &str {
        let start = self.offset as usize;
        let end = floor_char_boundary(self.text, start + COLON_LOOKAHEAD);
        &self.text[start..end]
    }
}

/// Fill prefix, ranges and quote state from the node under the cursor.
fn fill_prefix(ctx: &mut DocumentContext, text: &str, offset: usize, node: &Node) {
    if node.is_string() {
        let content = rbxjson_tree::content_span(node);
        let start = content.start as usize;
        let end = offset.clamp(start, content.end as usize);
        ctx.prefix = text.get(start..end).unwrap_or_default().to_string();
        ctx.range = content;
        ctx.token_range = node.span;
        ctx.inside_quote = true;
    } else {
        ctx.prefix = word_before(text, offset).to_string();
        let offset = offset as u32;
        ctx.range = Span::new(offset - ctx.prefix.len() as u32, offset);
        ctx.token_range = ctx.range;
        ctx.inside_quote = false;
    }
}

/// The identifier run ending at `offset`.
fn word_before(text: &str, offset: usize) -> &str {
    let before = &text[..offset];
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .last()
        .map_or(offset, |(i, _)| i);
    &before[start..]
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context_at;
    use proptest::prelude::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    #[test]
    fn test_bool_value_slot() {
        let ctx = context_at(
            r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": |}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::ValueField);
        assert_eq!(ctx.class_name.as_deref(), Some("Part"));
        assert_eq!(ctx.property_name.as_deref(), Some("Anchored"));
        assert_eq!(ctx.property_type.as_deref(), Some("bool"));
        assert_eq!(ctx.prefix, "");
        assert!(!ctx.inside_quote);
    }

    #[test]
    fn test_partial_bool_word() {
        let ctx = context_at(
            r#"{"properties": {"Anchored": {"type": "bool", "value": tr|}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::ValueField);
        assert_eq!(ctx.prefix, "tr");
        assert_eq!(ctx.range.len(), 2);
    }

    #[test]
    fn test_vector_leaf() {
        let ctx = context_at(
            r#"{"properties": {"Size": {"type": "Vector3", "value": {"x": 0, "y": |}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::VectorField);
        assert_eq!(ctx.property_type.as_deref(), Some("Vector3"));
        assert_eq!(
            ctx.path,
            vec![key("properties"), key("Size"), key("value"), key("y")]
        );
    }

    #[test]
    fn test_empty_enum_type_slot() {
        let ctx = context_at(
            r#"{"className": "Part", "properties": {"Material": {"type": "Enum", "value": {"enumType": |}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::EnumType);
        assert_eq!(ctx.property_name.as_deref(), Some("Material"));
        assert_eq!(ctx.prefix, "");
    }

    #[test]
    fn test_enum_type_slot_in_broken_document() {
        // nothing after the colon, no closing braces
        let ctx = context_at("{\"properties\": {\"Material\": {\"value\": {\"enumType\": |");
        assert_eq!(ctx.kind, ContextKind::EnumType);
        assert_eq!(ctx.property_name.as_deref(), Some("Material"));
    }

    #[test]
    fn test_enum_value_slot() {
        let ctx = context_at(
            r#"{"properties": {"Material": {"type": "Enum", "value": {"enumType": "Material", "value": |}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::EnumValue);
        assert_eq!(ctx.enum_type.as_deref(), Some("Material"));
    }

    #[test]
    fn test_enum_value_string() {
        let ctx = context_at(
            r#"{"properties": {"Material": {"type": "Enum", "value": {"enumType": "Material", "value": "Pl|"}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::EnumValue);
        assert_eq!(ctx.enum_type.as_deref(), Some("Material"));
        assert_eq!(ctx.prefix, "Pl");
        assert!(ctx.inside_quote);
    }

    #[test]
    fn test_enum_value_without_type_field() {
        let ctx = context_at(
            r#"{"properties": {"Material": {"value": {"enumType": "Material", "value": "|"}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::EnumValue);
        assert_eq!(ctx.property_type, None);
        assert_eq!(ctx.enum_type.as_deref(), Some("Material"));
    }

    #[test]
    fn test_enum_value_object_keys() {
        let ctx = context_at(
            r#"{"properties": {"Material": {"type": "Enum", "value": {"en|"}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::EnumValueKey);
        assert_eq!(ctx.prefix, "en");
    }

    #[test]
    fn test_wrong_value_structure_spans_value() {
        let source = r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": {"x": 1}}}}"#;
        let value_start = source.find("{\"x\"").unwrap();
        let value_end = value_start + "{\"x\": 1}".len();
        let cursor = value_start + 3;

        let ctx = analyze(source, cursor);
        assert_eq!(ctx.kind, ContextKind::WrongValueStructure);
        assert_eq!(ctx.property_type.as_deref(), Some("bool"));
        assert_eq!(
            ctx.value_range,
            Some(Span::new(value_start as u32, value_end as u32))
        );
        assert_eq!(ctx.prefix, "");
    }

    #[test]
    fn test_wrong_value_structure_empty_object() {
        let ctx = context_at(
            r#"{"properties": {"Capabilities": {"type": "SecurityCapabilities", "value": {|}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::WrongValueStructure);
        assert!(ctx.value_range.is_some());
    }

    #[test]
    fn test_enum_type_slot_under_bool_is_wrong_structure() {
        let ctx = context_at(
            r#"{"properties": {"Anchored": {"type": "bool", "value": {"enumType": |}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::WrongValueStructure);
        assert_eq!(ctx.property_type.as_deref(), Some("bool"));
        assert!(ctx.value_range.is_some());

        let ctx = context_at(
            r#"{"properties": {"Size": {"type": "Vector3", "value": {"enumType": |}}}}"#,
        );
        assert_ne!(ctx.kind, ContextKind::EnumType);
    }

    #[test]
    fn test_every_offset_inside_scalar_value_is_wrong_structure() {
        let source = r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": {"enumType": "X", "value": [1, {"a": 2}]}}}}"#;
        let start = source.find("{\"enumType\"").unwrap();
        let end = source.len() - 3;
        assert_eq!(&source[end - 1..end], "}");
        let span = Span::new(start as u32, end as u32);

        for offset in start + 1..end {
            let ctx = analyze(source, offset);
            assert_eq!(
                ctx.kind,
                ContextKind::WrongValueStructure,
                "offset {offset}: {:?}",
                &source[..offset]
            );
            assert_eq!(ctx.value_range, Some(span), "offset {offset}");
        }
    }

    #[test]
    fn test_new_property_key() {
        let ctx = context_at(
            r#"{"className": "Part", "properties": {"Size": {"type": "Vector3"}, "Anc|"}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::PropertyKey);
        assert_eq!(ctx.prefix, "Anc");
        assert!(ctx.inside_quote);
        assert_eq!(ctx.token_range.len(), ctx.range.len() + 2);
        assert_eq!(ctx.existing_properties, vec!["Size".to_string()]);
    }

    #[test]
    fn test_existing_key_reads_as_property_object() {
        let ctx = context_at(r#"{"properties": {"Anchored|": {"type": "bool"}}}"#);
        assert_eq!(ctx.kind, ContextKind::PropertyValueKey);
        assert_eq!(ctx.property_name.as_deref(), Some("Anchored"));
    }

    #[test]
    fn test_property_object_keys() {
        let ctx = context_at(r#"{"properties": {"Anchored": {"ty|"}}}"#);
        assert_eq!(ctx.kind, ContextKind::PropertyValueKey);

        let ctx = context_at(r#"{"properties": {"Anchored": { | }}}"#);
        assert_eq!(ctx.kind, ContextKind::PropertyValueKey);
    }

    #[test]
    fn test_type_and_original_type_fields() {
        let ctx = context_at(r#"{"properties": {"Size": {"type": "Vec|"}}}"#);
        assert_eq!(ctx.kind, ContextKind::TypeField);
        assert_eq!(ctx.property_name.as_deref(), Some("Size"));
        assert_eq!(ctx.prefix, "Vec");

        let ctx = context_at(r#"{"properties": {"SoundId": {"originalType": "|"}}}"#);
        assert_eq!(ctx.kind, ContextKind::OriginalTypeField);
    }

    #[test]
    fn test_nested_struct_fields() {
        let ctx = context_at(
            r#"{"properties": {"Size": {"type": "UDim2", "value": {"x": {|}}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::StructFieldKey);
        assert_eq!(ctx.struct_type, Some("UDim"));

        let ctx = context_at(
            r#"{"properties": {"Size": {"type": "UDim2", "value": {"x": {"scale": |}}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::VectorField);

        let ctx = context_at(
            r#"{"properties": {"Size": {"type": "Vector3", "value": {"|"}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::StructFieldKey);
        assert_eq!(ctx.struct_type, Some("Vector3"));
    }

    #[test]
    fn test_keypoint_leaf_is_not_a_value_slot() {
        let ctx = context_at(
            r#"{"properties": {"T": {"type": "NumberSequence", "value": {"keypoints": [{"time": 0, "value": |}]}}}}"#,
        );
        assert_eq!(ctx.kind, ContextKind::VectorField);
    }

    #[test]
    fn test_root_keys() {
        assert_eq!(context_at("|").kind, ContextKind::RootKey);
        assert_eq!(context_at("{|}").kind, ContextKind::RootKey);

        let ctx = context_at(r#"{"cl|"}"#);
        assert_eq!(ctx.kind, ContextKind::RootKey);
        assert_eq!(ctx.prefix, "cl");
    }

    #[test]
    fn test_class_name_value() {
        let ctx = context_at(r#"{"className": "pa|rt"}"#);
        assert_eq!(ctx.kind, ContextKind::ClassName);
        assert_eq!(ctx.prefix, "pa");
        assert_eq!(ctx.range.len(), 4);

        // right after the closing quote
        let ctx = context_at(r#"{"className": "Part"|}"#);
        assert_eq!(ctx.kind, ContextKind::ClassName);
        assert_eq!(ctx.prefix, "Part");
    }

    #[test]
    fn test_attributes_and_tags() {
        assert_eq!(
            context_at(r#"{"attributes": {|}}"#).kind,
            ContextKind::AttributeKey
        );
        assert_eq!(
            context_at(r#"{"attributes": {"He|"}}"#).kind,
            ContextKind::AttributeKey
        );
        assert_eq!(
            context_at(r#"{"attributes": {"Health": |}}"#).kind,
            ContextKind::AttributeValue
        );

        let ctx = context_at(r#"{"tags": ["Do|"]}"#);
        assert_eq!(ctx.kind, ContextKind::Tag);
        assert_eq!(ctx.prefix, "Do");
    }

    #[test]
    fn test_unclassifiable_position() {
        let ctx = context_at(r#"{"extra": {"deep": |}}"#);
        assert_eq!(ctx.kind, ContextKind::Unknown);
    }

    proptest! {
        #[test]
        fn classify_is_total(
            source in r#"[{}\[\]:,"a-zA-Z0-9 \n]{0,64}"#,
            cursor in 0usize..80,
        ) {
            let ctx = analyze(&source, cursor);
            let offset = cursor.min(source.len());
            prop_assert!(ctx.range.end as usize <= source.len().max(offset));
            prop_assert!(ctx.range.start <= ctx.range.end);
        }

        #[test]
        fn bare_prefix_ends_at_cursor(
            source in r#"[{}\[\]:,"a-z0-9 ]{0,48}"#,
            cursor in 0usize..48,
        ) {
            let ctx = analyze(&source, cursor);
            if !ctx.inside_quote {
                let offset = cursor.min(source.len());
                prop_assert_eq!(ctx.range.end as usize, offset);
                prop_assert_eq!(&source[ctx.range.start as usize..offset], ctx.prefix.as_str());
            }
        }
    }
}
