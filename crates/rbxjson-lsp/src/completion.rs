//! Completion candidates for a classified cursor position.

use rbxjson_tree::Span;
use tracing::debug;

use crate::analyzer::{ContextKind, DocumentContext};
use crate::schema::{PropertyInfo, SchemaStore, TypeCategory};
use crate::tables;
use crate::templates::{self, Placeholders};

/// How many own properties a class's documentation lists.
const CLASS_DOC_PROPERTIES: usize = 10;

/// Sort key that places a candidate ahead of everything else.
const SORT_FIRST: &str = "!0000";

/// The kind of a candidate, mapped onto the editor's completion icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Property,
    Class,
    Field,
    TypeParameter,
    Enum,
    EnumMember,
    Value,
    Keyword,
    Snippet,
    /// A repair action.
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertFormat {
    Plain,
    Snippet,
}

/// One completion candidate. Accepting it replaces `replace_range` with
/// `insert_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CandidateKind,
    pub detail: Option<String>,
    /// Markdown.
    pub documentation: Option<String>,
    pub replace_range: Span,
    pub insert_text: String,
    pub insert_format: InsertFormat,
    pub filter_key: String,
    pub sort_key: String,
    pub preselect: bool,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CandidateKind, range: Span, insert: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            filter_key: label.to_lowercase(),
            sort_key: label.clone(),
            label,
            kind,
            detail: None,
            documentation: None,
            replace_range: range,
            insert_text: insert.into(),
            insert_format: InsertFormat::Plain,
            preselect: false,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn docs(mut self, markdown: impl Into<String>) -> Self {
        self.documentation = Some(markdown.into());
        self
    }

    fn snippet(mut self) -> Self {
        self.insert_format = InsertFormat::Snippet;
        self
    }

    fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort_key = key.into();
        self
    }

    fn filter(mut self, key: impl Into<String>) -> Self {
        self.filter_key = key.into();
        self
    }
}

/// Builds candidates from a [`DocumentContext`] and a schema.
pub struct CompletionGenerator<'s> {
    schema: &'s dyn SchemaStore,
}

impl<'s> CompletionGenerator<'s> {
    pub fn new(schema: &'s dyn SchemaStore) -> Self {
        Self { schema }
    }

    /// Candidates for `ctx`, filtered by its prefix (case-insensitively),
    /// ordered by sort key, with the first one preselected.
    pub fn complete(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        let mut candidates = match ctx.kind {
            ContextKind::RootKey => self.root_keys(ctx),
            ContextKind::ClassName => self.class_names(ctx),
            ContextKind::PropertyKey => self.property_keys(ctx),
            ContextKind::PropertyValueKey => field_keys(
                ctx,
                &[
                    ("type", "Property type (bool, string, Enum, etc.)"),
                    ("value", "Property value"),
                    ("originalType", "Serialized type when it differs from type"),
                ],
            ),
            ContextKind::EnumValueKey => field_keys(
                ctx,
                &[("enumType", "The enum type name"), ("value", "The enum value")],
            ),
            ContextKind::StructFieldKey => struct_field_keys(ctx),
            ContextKind::TypeField => self.type_tags(ctx),
            ContextKind::OriginalTypeField => original_types(ctx),
            ContextKind::EnumType => self.enum_types(ctx),
            ContextKind::EnumValue => self.enum_values(ctx),
            ContextKind::ValueField => self.values(ctx),
            ContextKind::WrongValueStructure => structure_fix(ctx).into_iter().collect(),
            ContextKind::AttributeKey => attribute_keys(ctx),
            ContextKind::AttributeValue => attribute_values(ctx),
            ContextKind::Tag => tags(ctx),
            ContextKind::VectorField | ContextKind::Unknown => Vec::new(),
        };

        let prefix = ctx.prefix.to_lowercase();
        candidates.retain(|c| c.label.to_lowercase().starts_with(&prefix));
        candidates.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
        for (index, candidate) in candidates.iter_mut().enumerate() {
            candidate.preselect = index == 0;
        }

        debug!(kind = %ctx.kind, prefix = %ctx.prefix, count = candidates.len(), "completions");
        candidates
    }

    fn root_keys(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        let keys = tables::ROOT_KEYS.iter().map(|(key, detail, snippet, required)| {
            let tier = if *required { '0' } else { '1' };
            CompletionCandidate::new(*key, CandidateKind::Property, ctx.token_range, *snippet)
                .detail(*detail)
                .snippet()
                .sort(format!("{tier}{key}"))
        });

        let templates = tables::TEMPLATE_CLASSES
            .iter()
            .filter(|class| self.schema.class_info(class).is_some())
            .map(|class| {
                CompletionCandidate::new(
                    format!("{class} template"),
                    CandidateKind::Snippet,
                    ctx.token_range,
                    templates::class_template(self.schema, class),
                )
                .detail(format!("Full rbxjson for {class}"))
                .docs(format!("Creates a complete **{class}** rbxjson with common properties."))
                .snippet()
                .sort(format!("00{class}"))
            });

        keys.chain(templates).collect()
    }

    fn class_names(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        self.schema
            .all_class_names()
            .into_iter()
            .map(|name| {
                let sort = match tables::COMMON_CLASSES.iter().position(|c| *c == name) {
                    Some(index) => format!("0{index:02}{name}"),
                    None => format!("1{name}"),
                };
                let mut candidate =
                    CompletionCandidate::new(name, CandidateKind::Class, ctx.range, quoted(ctx, name))
                        .docs(self.class_documentation(name))
                        .sort(sort);
                if let Some(superclass) = self
                    .schema
                    .class_info(name)
                    .and_then(|info| info.superclass.as_deref())
                {
                    candidate = candidate.detail(format!("extends {superclass}"));
                }
                candidate
            })
            .collect()
    }

    fn class_documentation(&self, class: &str) -> String {
        let mut doc = format!("**{class}**\n\n");

        let ancestors: Vec<&str> = self
            .schema
            .inheritance_chain(class)
            .into_iter()
            .rev()
            .skip(1)
            .collect();
        if !ancestors.is_empty() {
            doc.push_str(&format!("Inherits: {}\n\n", ancestors.join(" → ")));
        }

        if let Some(info) = self.schema.class_info(class)
            && !info.tags.is_empty()
        {
            doc.push_str(&format!("Tags: {}\n\n", info.tags.join(", ")));
        }

        let properties = self.schema.serializable_properties(class);
        let own: Vec<_> = properties.iter().filter(|p| p.defined_in == class).collect();
        if !own.is_empty() {
            doc.push_str(&format!(
                "**Properties** ({} own, {} total)\n",
                own.len(),
                properties.len()
            ));
            let lines: Vec<String> = own
                .iter()
                .take(CLASS_DOC_PROPERTIES)
                .map(|p| format!("- {}: {}", p.name, p.value_type.name))
                .collect();
            doc.push_str(&lines.join("\n"));
            if own.len() > CLASS_DOC_PROPERTIES {
                doc.push_str(&format!(
                    "\n- ... and {} more",
                    own.len() - CLASS_DOC_PROPERTIES
                ));
            }
        }

        doc
    }

    fn property_keys(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        let Some(class) = ctx.class_name.as_deref() else {
            return Vec::new();
        };

        self.schema
            .serializable_properties(class)
            .into_iter()
            .filter(|p| !ctx.existing_properties.contains(&p.name))
            .map(|property| {
                let ty = self.schema.expected_type(class, &property.name);
                let snippet = templates::property_snippet(
                    &property.name,
                    ty.as_deref(),
                    templates::enum_name(property),
                    &mut Placeholders::starting_at(1),
                    0,
                );
                let own = property.defined_in == class;
                let detail = if own {
                    property.value_type.name.clone()
                } else {
                    format!("{} (from {})", property.value_type.name, property.defined_in)
                };
                CompletionCandidate::new(
                    property.name.as_str(),
                    CandidateKind::Property,
                    ctx.token_range,
                    snippet,
                )
                .detail(detail)
                .docs(property_documentation(property))
                .snippet()
                .sort(format!("{}{}", if own { "00" } else { "01" }, property.name))
            })
            .collect()
    }

    fn type_tags(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        if let Some(expected) = self.expected_type(ctx) {
            let property = ctx.property_name.as_deref().unwrap_or_default();
            return vec![
                CompletionCandidate::new(
                    expected.as_str(),
                    CandidateKind::TypeParameter,
                    ctx.range,
                    quoted(ctx, &expected),
                )
                .detail(format!("Type for {property}"))
                .sort("0000"),
            ];
        }

        tables::PROPERTY_TYPES
            .iter()
            .chain(&["Enum", "Ref"])
            .enumerate()
            .map(|(index, ty)| {
                CompletionCandidate::new(*ty, CandidateKind::TypeParameter, ctx.range, quoted(ctx, ty))
                    .sort(format!("00{index:02}"))
            })
            .collect()
    }

    fn enum_types(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        if let Some(expected) = self.expected_enum(ctx) {
            let property = ctx.property_name.as_deref().unwrap_or_default();
            return vec![
                CompletionCandidate::new(expected, CandidateKind::Enum, ctx.range, quoted(ctx, expected))
                    .detail(format!("Enum type for {property}"))
                    .sort("0000"),
            ];
        }

        self.schema
            .all_enum_names()
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                CompletionCandidate::new(name, CandidateKind::Enum, ctx.range, quoted(ctx, name))
                    .sort(format!("00{index:04}"))
            })
            .collect()
    }

    fn enum_values(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        let Some(enum_type) = ctx
            .enum_type
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.expected_enum(ctx))
        else {
            debug!("no enum type to complete values for");
            return Vec::new();
        };

        self.schema
            .enum_values(enum_type)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                CompletionCandidate::new(
                    item.name.as_str(),
                    CandidateKind::EnumMember,
                    ctx.range,
                    quoted(ctx, &item.name),
                )
                .detail(format!("{enum_type}.{} = {}", item.name, item.value))
                .sort(format!("00{index:04}"))
            })
            .collect()
    }

    fn values(&self, ctx: &DocumentContext) -> Vec<CompletionCandidate> {
        let Some(ty) = ctx.property_type.as_deref() else {
            return Vec::new();
        };
        let range = ctx.token_range;
        let value = |label: &str, detail: String| {
            CompletionCandidate::new(label, CandidateKind::Value, range, label).detail(detail)
        };

        match ty {
            "bool" => ["true", "false"]
                .into_iter()
                .enumerate()
                .map(|(index, literal)| value(literal, "Boolean value".into()).sort(format!("00{index:02}")))
                .collect(),
            "SecurityCapabilities" => vec![
                value("0", "SecurityCapabilities bitmask (u64) - 0 = none".into())
                    .docs(
                        "**SecurityCapabilities** is a numeric bitmask (u64), **NOT** an object \
                         with boolean fields.\n\nUse `0` for no capabilities.",
                    )
                    .sort(SORT_FIRST),
            ],
            "int" | "int64" | "float" | "double" => vec![
                value("0", format!("{ty} value"))
                    .docs(format!("Numeric {ty} value"))
                    .sort(SORT_FIRST),
            ],
            "BrickColor" => vec![value("194", "BrickColor palette index (Medium stone grey)".into()).sort(SORT_FIRST)],
            "Ref" => vec![value("null", "Empty reference".into()).sort(SORT_FIRST)],
            "string" | "Content" | "ProtectedString" | "BinaryString" | "UniqueId" => {
                if ctx.inside_quote {
                    Vec::new()
                } else {
                    vec![value("\"\"", format!("Empty {ty}")).sort(SORT_FIRST)]
                }
            }
            _ if ty == "Enum" || tables::is_struct(ty) => {
                let enum_name = self.property_info(ctx).and_then(templates::enum_name);
                let skeleton =
                    templates::value_skeleton(Some(ty), enum_name, &mut Placeholders::starting_at(1), 0);
                vec![
                    CompletionCandidate::new(ty, CandidateKind::Value, range, skeleton)
                        .detail(format!("{ty} value"))
                        .snippet()
                        .sort(SORT_FIRST),
                ]
            }
            _ => Vec::new(),
        }
    }

    fn property_info(&self, ctx: &DocumentContext) -> Option<&'s PropertyInfo> {
        let class = ctx.class_name.as_deref()?;
        let property = ctx.property_name.as_deref()?;
        self.schema.property_info(class, property)
    }

    fn expected_type(&self, ctx: &DocumentContext) -> Option<String> {
        let class = ctx.class_name.as_deref()?;
        let property = ctx.property_name.as_deref()?;
        self.schema.expected_type(class, property)
    }

    /// The enum a property's value must come from, per the schema.
    fn expected_enum(&self, ctx: &DocumentContext) -> Option<&'s str> {
        self.property_info(ctx)
            .filter(|p| p.value_type.category == TypeCategory::Enum)
            .map(|p| p.value_type.name.as_str())
    }
}

/// Insert text for a value in string position: as-is inside quotes,
/// otherwise quoted.
fn quoted(ctx: &DocumentContext, text: &str) -> String {
    if ctx.inside_quote {
        text.to_string()
    } else {
        format!("\"{text}\"")
    }
}

/// Insert text and range for an object key.
fn key_edit(ctx: &DocumentContext, key: &str) -> (Span, String) {
    if ctx.inside_quote {
        (ctx.range, key.to_string())
    } else {
        (ctx.token_range, format!("\"{key}\": "))
    }
}

fn field_keys(ctx: &DocumentContext, keys: &[(&str, &str)]) -> Vec<CompletionCandidate> {
    keys.iter()
        .enumerate()
        .map(|(index, (key, detail))| {
            let (range, insert) = key_edit(ctx, key);
            CompletionCandidate::new(*key, CandidateKind::Field, range, insert)
                .detail(*detail)
                .sort(format!("00{index:02}"))
        })
        .collect()
}

fn struct_field_keys(ctx: &DocumentContext) -> Vec<CompletionCandidate> {
    let Some(fields) = ctx.struct_type.and_then(tables::struct_fields) else {
        return Vec::new();
    };
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let (range, insert) = key_edit(ctx, field.name);
            CompletionCandidate::new(field.name, CandidateKind::Field, range, insert)
                .detail(field.description)
                .sort(format!("00{index:02}"))
        })
        .collect()
}

fn original_types(ctx: &DocumentContext) -> Vec<CompletionCandidate> {
    tables::ORIGINAL_TYPES
        .iter()
        .enumerate()
        .map(|(index, (name, serialized, description))| {
            CompletionCandidate::new(*name, CandidateKind::TypeParameter, ctx.range, quoted(ctx, name))
                .detail(format!("→ {serialized}"))
                .docs(format!(
                    "**{name}**\n\n{description}\n\nSerialized as: `{serialized}`"
                ))
                .sort(format!("00{index:02}"))
        })
        .collect()
}

/// The single repair candidate for an object or array where a scalar
/// belongs.
fn structure_fix(ctx: &DocumentContext) -> Option<CompletionCandidate> {
    let ty = ctx.property_type.as_deref()?;
    let value_range = ctx.value_range?;

    let (literal, detail) = match ty {
        "bool" => ("false", "Fix: bool value should be true or false, not an object".to_string()),
        "SecurityCapabilities" => (
            "0",
            "Fix: SecurityCapabilities is a numeric bitmask (u64), not an object".to_string(),
        ),
        "int" | "int64" | "float" | "double" => {
            ("0", format!("Fix: {ty} should be a number, not an object"))
        }
        "string" | "Content" | "ProtectedString" | "BinaryString" | "UniqueId" => {
            ("\"\"", format!("Fix: {ty} should be a string, not an object"))
        }
        "BrickColor" => (
            "194",
            "Fix: BrickColor should be a number (color code), not an object".to_string(),
        ),
        "Ref" => ("null", "Fix: Ref should be a string or null, not an object".to_string()),
        _ => ("null", format!("Fix: {ty} has wrong structure")),
    };

    Some(
        CompletionCandidate::new(
            format!("Fix: Replace with {literal}"),
            CandidateKind::Event,
            value_range,
            literal,
        )
        .detail(detail)
        .docs(format!(
            "**Structure Error**\n\nThe `value` field for type `{ty}` should be `{literal}`, \
             not an object.\n\nSelecting this will replace the entire value."
        ))
        .sort(SORT_FIRST)
        .filter(""),
    )
}

fn attribute_keys(ctx: &DocumentContext) -> Vec<CompletionCandidate> {
    tables::ATTRIBUTE_KEYS
        .iter()
        .enumerate()
        .map(|(index, (name, detail))| {
            CompletionCandidate::new(
                *name,
                CandidateKind::Property,
                ctx.token_range,
                format!("\"{name}\": ${{1}}"),
            )
            .detail(*detail)
            .snippet()
            .sort(format!("00{index:02}"))
        })
        .collect()
}

fn attribute_values(ctx: &DocumentContext) -> Vec<CompletionCandidate> {
    tables::ATTRIBUTE_VALUES
        .iter()
        .enumerate()
        .map(|(index, (label, literal, detail))| {
            CompletionCandidate::new(*label, CandidateKind::Value, ctx.token_range, *literal)
                .detail(*detail)
                .sort(format!("00{index:02}"))
        })
        .collect()
}

fn tags(ctx: &DocumentContext) -> Vec<CompletionCandidate> {
    tables::TAGS
        .iter()
        .enumerate()
        .map(|(index, (name, detail))| {
            CompletionCandidate::new(*name, CandidateKind::Keyword, ctx.range, quoted(ctx, name))
                .detail(*detail)
                .sort(format!("00{index:02}"))
        })
        .collect()
}

fn property_documentation(property: &PropertyInfo) -> String {
    let mut doc = format!("**{}**: {}\n\n", property.name, property.value_type.name);
    if !property.category.is_empty() {
        doc.push_str(&format!("Category: {}\n", property.category));
    }
    if !property.defined_in.is_empty() {
        doc.push_str(&format!("Defined in: {}\n", property.defined_in));
    }
    if let Some(default) = property.default_value.as_deref().filter(|d| !d.is_empty()) {
        doc.push_str(&format!("Default: {default}\n"));
    }
    if !property.tags.is_empty() {
        doc.push_str(&format!("Tags: {}\n", property.tags.join(", ")));
    }
    doc
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::schema::MemorySchema;
    use crate::testing::{context_at, expand_snippet, fixture_schema};

    fn complete(schema: &MemorySchema, source: &str) -> Vec<CompletionCandidate> {
        CompletionGenerator::new(schema).complete(&context_at(source))
    }

    fn labels(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_bool_value_candidates() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": |}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["true", "false"]);
        assert!(candidates[0].preselect);
        assert!(!candidates[1].preselect);
    }

    #[test]
    fn test_numeric_leaf_has_no_candidates() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"properties": {"Size": {"type": "Vector3", "value": {"x": 0, "y": |}}}}"#,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_enum_values_in_declared_order() {
        let schema = fixture_schema();
        let source = r#"{"className": "Part", "properties": {"Material": {"type": "Enum", "value": {"enumType": "Material", "value": "|"}}}}"#;
        let candidates = complete(&schema, source);
        assert_eq!(
            labels(&candidates),
            vec!["Plastic", "Wood", "Slate", "Concrete", "Neon"]
        );
        assert_eq!(candidates[2].detail.as_deref(), Some("Material.Slate = 800"));
        assert_eq!(candidates[0].insert_text, "Plastic");

        let filtered = complete(&schema, &source.replace("\"|\"", "\"s|\""));
        assert_eq!(labels(&filtered), vec!["Slate"]);
    }

    #[test]
    fn test_enum_values_inferred_from_schema() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Shape": {"type": "Enum", "value": {"value": "|"}}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Ball", "Block", "Cylinder"]);
    }

    #[test]
    fn test_enum_values_without_any_enum_type() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"properties": {"Shape": {"type": "Enum", "value": {"enumType": "", "value": "|"}}}}"#,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_enum_type_slot_quotes_insert() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Material": {"type": "Enum", "value": {"enumType": |}}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Material"]);
        assert_eq!(candidates[0].insert_text, "\"Material\"");
    }

    #[test]
    fn test_enum_types_fallback_lists_all() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"properties": {"Material": {"type": "Enum", "value": {"enumType": "|"}}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Material", "PartType"]);
    }

    #[test]
    fn test_class_names_common_first() {
        let schema = fixture_schema();
        let source = r#"{"className": "p|"}"#;
        let candidates = complete(&schema, source);
        assert_eq!(labels(&candidates), vec!["Part", "PVInstance"]);
        assert_eq!(candidates[0].detail.as_deref(), Some("extends BasePart"));

        let doc = candidates[0].documentation.as_deref().unwrap();
        assert!(doc.starts_with("**Part**\n\nInherits: BasePart → PVInstance → Instance"));
        assert!(doc.contains("**Properties** (1 own, 12 total)\n- Shape: PartType"));

        let range = candidates[0].replace_range;
        let mut edited = "{\"className\": \"p\"}".to_string();
        edited.replace_range(range.start as usize..range.end as usize, &candidates[0].insert_text);
        assert_eq!(edited, r#"{"className": "Part"}"#);
    }

    #[test]
    fn test_property_keys_insert_skeleton() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Anc|"}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Anchored"]);
        let anchored = &candidates[0];
        assert_eq!(anchored.insert_format, InsertFormat::Snippet);
        assert_eq!(anchored.detail.as_deref(), Some("bool (from BasePart)"));
        assert_eq!(
            anchored.insert_text,
            "\"Anchored\": {\n\t\"type\": \"bool\",\n\t\"value\": ${1|true,false|}\n}"
        );
        // the whole quoted key is replaced
        assert_eq!(anchored.replace_range.len(), "\"Anc\"".len() as u32);
    }

    #[test]
    fn test_property_keys_skip_existing_and_sort_own_first() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": true}, "|"}}"#,
        );
        let names = labels(&candidates);
        assert!(!names.contains(&"Anchored"));
        assert_eq!(names[0], "Shape");
        assert!(names.contains(&"Name"));
    }

    #[test]
    fn test_property_keys_need_a_class() {
        let schema = fixture_schema();
        assert!(complete(&schema, r#"{"properties": {"|"}}"#).is_empty());
    }

    #[test]
    fn test_structure_fix_replaces_whole_value() {
        let schema = fixture_schema();
        let source = r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": {"x|": 1}}}}"#;
        let ctx = context_at(source);
        let candidates = CompletionGenerator::new(&schema).complete(&ctx);
        assert_eq!(candidates.len(), 1);
        let fix = &candidates[0];
        assert_eq!(fix.label, "Fix: Replace with false");
        assert_eq!(fix.kind, CandidateKind::Event);
        assert_eq!(Some(fix.replace_range), ctx.value_range);
        assert_eq!(fix.sort_key, SORT_FIRST);
        assert!(fix.preselect);
    }

    #[test]
    fn test_structure_fix_literal_per_type() {
        let schema = fixture_schema();
        let cases = [
            ("bool", "false"),
            ("int", "0"),
            ("int64", "0"),
            ("float", "0"),
            ("double", "0"),
            ("SecurityCapabilities", "0"),
            ("string", "\"\""),
            ("Content", "\"\""),
            ("ProtectedString", "\"\""),
            ("BinaryString", "\"\""),
            ("UniqueId", "\"\""),
            ("BrickColor", "194"),
            ("Ref", "null"),
        ];
        for (ty, literal) in cases {
            let source = format!(r#"{{"properties": {{"P": {{"type": "{ty}", "value": {{|}}}}}}}}"#);
            let ctx = context_at(&source);
            let candidates = CompletionGenerator::new(&schema).complete(&ctx);
            assert_eq!(candidates.len(), 1, "{ty}");
            assert_eq!(candidates[0].insert_text, literal, "{ty}");
            assert_eq!(candidates[0].label, format!("Fix: Replace with {literal}"));
            assert_eq!(Some(candidates[0].replace_range), ctx.value_range, "{ty}");
        }
    }

    #[test]
    fn test_enum_type_slot_under_scalar_offers_fix() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Anchored": {"type": "bool", "value": {"enumType": |}}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Fix: Replace with false"]);

        let candidates = complete(
            &schema,
            r#"{"properties": {"Size": {"type": "Vector3", "value": {"enumType": |}}}}"#,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_original_type_candidates() {
        let schema = fixture_schema();
        let candidates = complete(&schema, r#"{"properties": {"SoundId": {"originalType": "|"}}}"#);
        assert_eq!(candidates.len(), tables::ORIGINAL_TYPES.len());
        assert_eq!(candidates[0].label, "ContentId");
        assert_eq!(candidates[0].detail.as_deref(), Some("→ string"));
        assert_eq!(candidates[0].insert_text, "ContentId");

        let candidates = complete(&schema, r#"{"properties": {"SoundId": {"originalType": "Q|"}}}"#);
        assert_eq!(labels(&candidates), vec!["QDir", "QFont"]);
    }

    #[test]
    fn test_attribute_value_candidates() {
        let schema = fixture_schema();
        let candidates = complete(&schema, r#"{"attributes": {"Health": |}}"#);
        assert_eq!(
            labels(&candidates),
            vec!["string", "number", "boolean", "Vector3", "Color3", "UDim", "UDim2"]
        );
        assert_eq!(candidates[0].insert_text, "\"\"");
        assert!(candidates[0].preselect);

        let candidates = complete(&schema, r#"{"attributes": {"Health": nu|}}"#);
        assert_eq!(labels(&candidates), vec!["number"]);
        assert_eq!(candidates[0].insert_text, "0");
        assert_eq!(candidates[0].replace_range.len(), 2);
    }

    #[test]
    fn test_property_value_keys_include_original_type() {
        let schema = fixture_schema();
        let candidates = complete(&schema, r#"{"properties": {"SoundId": {"|"}}}"#);
        assert_eq!(labels(&candidates), vec!["type", "value", "originalType"]);
    }

    #[test]
    fn test_type_field_expected_and_fallback() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Size": {"type": "|"}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Vector3"]);

        let candidates = complete(&schema, r#"{"properties": {"Size": {"type": "|"}}}"#);
        assert_eq!(candidates.len(), tables::PROPERTY_TYPES.len() + 2);
        assert_eq!(candidates[0].label, "bool");

        let candidates = complete(&schema, r#"{"properties": {"Size": {"type": "vec|"}}}"#);
        assert_eq!(
            labels(&candidates),
            vec!["Vector2", "Vector2int16", "Vector3", "Vector3int16"]
        );
    }

    #[test]
    fn test_struct_field_keys() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"properties": {"Size": {"type": "UDim2", "value": {"x": {"|"}}}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["scale", "offset"]);
        assert_eq!(candidates[0].detail.as_deref(), Some("Scale factor (f32)"));
    }

    #[test]
    fn test_property_value_keys() {
        let schema = fixture_schema();
        let candidates = complete(&schema, r#"{"properties": {"Anchored": {"v|"}}}"#);
        assert_eq!(labels(&candidates), vec!["value"]);
        assert_eq!(candidates[0].insert_text, "value");
    }

    #[test]
    fn test_value_skeleton_for_struct() {
        let schema = fixture_schema();
        let candidates = complete(
            &schema,
            r#"{"className": "Part", "properties": {"Size": {"type": "Vector3", "value": |}}}"#,
        );
        assert_eq!(labels(&candidates), vec!["Vector3"]);
        let value: serde_json::Value =
            serde_json::from_str(&expand_snippet(&candidates[0].insert_text)).unwrap();
        assert_eq!(value, serde_json::json!({"x": 0, "y": 0, "z": 0}));
    }

    #[test]
    fn test_root_keys_and_templates() {
        let schema = fixture_schema();
        let candidates = complete(&schema, "{|}");
        let names = labels(&candidates);
        assert!(names.contains(&"className"));
        assert!(names.contains(&"Part template"));
        assert!(!names.contains(&"LocalScript template"));
        assert!(names[0].ends_with(" template"));

        let candidates = complete(&schema, r#"{"cl|"}"#);
        assert_eq!(labels(&candidates), vec!["className"]);
        assert_eq!(candidates[0].insert_text, "\"className\": \"${1:Part}\"");
        assert_eq!(candidates[0].replace_range, Span::new(1, 5));
    }

    #[test]
    fn test_attributes_and_tags() {
        let schema = fixture_schema();
        let candidates = complete(&schema, r#"{"attributes": {"He|"}}"#);
        assert_eq!(labels(&candidates), vec!["Health"]);
        assert_eq!(candidates[0].insert_text, "\"Health\": ${1}");

        let candidates = complete(&schema, r#"{"tags": [|]}"#);
        assert_eq!(candidates.len(), tables::TAGS.len());
        assert_eq!(candidates[0].insert_text, "\"Interactable\"");
    }

    proptest! {
        #[test]
        fn labels_match_prefix(
            source in r#"[{}\[\]:,"a-zA-Z0-9 ]{0,64}"#,
            cursor in 0usize..64,
        ) {
            let schema = fixture_schema();
            let ctx = crate::analyzer::analyze(&source, cursor);
            let prefix = ctx.prefix.to_lowercase();
            for candidate in CompletionGenerator::new(&schema).complete(&ctx) {
                prop_assert!(candidate.label.to_lowercase().starts_with(&prefix));
            }
        }
    }
}
