//! Snippet skeletons for property values and whole documents.
//!
//! [`value_skeleton`] is the one mapping from a canonical type tag to the
//! text inserted for its value. Single-property completions and class
//! templates both go through it, threading a [`Placeholders`] counter so tab
//! stops stay numbered in document order.

use std::collections::HashSet;

use crate::schema::{PropertyInfo, SchemaStore, TypeCategory};
use crate::tables::{self, FieldShape, StructField, priority_properties};

/// Most properties rendered into a class template.
pub const TEMPLATE_PROPERTY_LIMIT: usize = 8;

/// Tab stop counter.
#[derive(Debug, Clone)]
pub struct Placeholders {
    next: u32,
}

impl Placeholders {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// The index the next placeholder will get.
    pub fn peek(&self) -> u32 {
        self.next
    }

    fn take(&mut self) -> u32 {
        let index = self.next;
        self.next += 1;
        index
    }

    /// `${n:default}`, or `${n}` for an empty default.
    pub fn placeholder(&mut self, default: &str) -> String {
        let index = self.take();
        if default.is_empty() {
            format!("${{{index}}}")
        } else {
            format!("${{{index}:{}}}", escape_snippet(default))
        }
    }

    /// `${n|a,b|}`.
    pub fn choice(&mut self, options: &[&str]) -> String {
        let index = self.take();
        format!("${{{index}|{}|}}", options.join(","))
    }
}

/// Escape literal text for snippet syntax.
pub fn escape_snippet(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '$' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn tabs(level: usize) -> String {
    "\t".repeat(level)
}

#[derive(Clone, Copy)]
enum Layout {
    Block,
    Inline,
}

/// The value skeleton for a canonical type tag.
///
/// `level` is the indentation of the line the value starts on; multi-line
/// skeletons indent their fields one level deeper. `enum_name` pre-fills
/// `enumType` for enum values.
pub fn value_skeleton(
    ty: Option<&str>,
    enum_name: Option<&str>,
    stops: &mut Placeholders,
    level: usize,
) -> String {
    let Some(ty) = ty else {
        return stops.placeholder("null");
    };
    match ty {
        "bool" => stops.choice(&["true", "false"]),
        "int" | "int64" | "float" | "double" | "SecurityCapabilities" => stops.placeholder("0"),
        "BrickColor" => stops.placeholder("194"),
        "string" | "ProtectedString" | "BinaryString" | "UniqueId" => {
            format!("\"{}\"", stops.placeholder(""))
        }
        "Content" => format!("\"{}\"", stops.placeholder("rbxassetid://")),
        "Ref" => "null".to_string(),
        "Enum" => {
            let enum_type = stops.placeholder(enum_name.unwrap_or_default());
            let value = stops.placeholder("");
            format!(
                "{{\n{inner}\"enumType\": \"{enum_type}\",\n{inner}\"value\": \"{value}\"\n{outer}}}",
                inner = tabs(level + 1),
                outer = tabs(level),
            )
        }
        _ => match tables::struct_fields(ty) {
            Some(fields) => struct_value(fields, &[], stops, level, Layout::Block, "0"),
            None => stops.placeholder("null"),
        },
    }
}

fn struct_value(
    fields: &[StructField],
    defaults: &[&str],
    stops: &mut Placeholders,
    level: usize,
    layout: Layout,
    time: &str,
) -> String {
    let mut numeric = 0;
    let mut parts = Vec::with_capacity(fields.len());

    for field in fields {
        let value = match field.shape {
            FieldShape::Number(default) => {
                let default = defaults.get(numeric).copied().unwrap_or(default);
                numeric += 1;
                stops.placeholder(default)
            }
            FieldShape::Bool => stops.placeholder("false"),
            FieldShape::Text(default) => format!("\"{}\"", stops.placeholder(default)),
            FieldShape::Struct(inner) | FieldShape::StructWith(inner, _) => {
                let nested_defaults = match field.shape {
                    FieldShape::StructWith(_, d) => d,
                    _ => &[],
                };
                let inner_fields = tables::struct_fields(inner).unwrap_or_default();
                struct_value(inner_fields, nested_defaults, stops, level + 1, layout, time)
            }
            FieldShape::Numbers(defaults) => {
                let items: Vec<String> = defaults.iter().map(|d| stops.placeholder(d)).collect();
                format!("[{}]", items.join(", "))
            }
            FieldShape::Literal(text) => escape_snippet(text),
            FieldShape::Keypoints(keypoint) => keypoints(keypoint, stops, level + 1),
            FieldShape::Time => time.to_string(),
        };
        parts.push(format!("\"{}\": {value}", field.name));
    }

    match layout {
        Layout::Inline => format!("{{ {} }}", parts.join(", ")),
        Layout::Block => {
            let inner = tabs(level + 1);
            let lines: Vec<String> = parts.iter().map(|part| format!("{inner}{part}")).collect();
            format!("{{\n{}\n{}}}", lines.join(",\n"), tabs(level))
        }
    }
}

/// A two-keypoint sequence spanning time 0 to 1.
fn keypoints(keypoint: &str, stops: &mut Placeholders, level: usize) -> String {
    let fields = tables::struct_fields(keypoint).unwrap_or_default();
    let inner = tabs(level + 1);
    let first = struct_value(fields, &[], stops, level + 1, Layout::Inline, "0");
    let last = struct_value(fields, &[], stops, level + 1, Layout::Inline, "1");
    format!("[\n{inner}{first},\n{inner}{last}\n{}]", tabs(level))
}

/// `"Name": { "type": ..., "value": ... }` with the value skeleton for `ty`.
///
/// An unknown type leaves both `type` and `value` as tab stops.
pub fn property_snippet(
    name: &str,
    ty: Option<&str>,
    enum_name: Option<&str>,
    stops: &mut Placeholders,
    level: usize,
) -> String {
    let inner = tabs(level + 1);
    let type_text = match ty {
        Some(ty) => ty.to_string(),
        None => stops.placeholder(""),
    };
    let value = value_skeleton(ty, enum_name, stops, level + 1);
    format!(
        "\"{}\": {{\n{inner}\"type\": \"{type_text}\",\n{inner}\"value\": {value}\n{}}}",
        escape_snippet(name),
        tabs(level),
    )
}

/// The enum a property's value belongs to, when its type is an enum.
pub fn enum_name(property: &PropertyInfo) -> Option<&str> {
    (property.value_type.category == TypeCategory::Enum).then_some(property.value_type.name.as_str())
}

/// Properties rendered into the template for `class`: its priority list
/// first, then its own properties, then inherited ones, capped at
/// [`TEMPLATE_PROPERTY_LIMIT`].
pub fn template_properties<'s>(schema: &'s dyn SchemaStore, class: &str) -> Vec<&'s PropertyInfo> {
    let properties = schema.serializable_properties(class);
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    let priority = priority_properties(class)
        .iter()
        .filter_map(|name| properties.iter().find(|p| p.name == *name));
    let own = properties.iter().filter(|p| p.defined_in == class);
    let inherited = properties.iter();

    for property in priority.chain(own).chain(inherited) {
        if seen.insert(property.name.as_str()) {
            ordered.push(*property);
        }
    }
    ordered.truncate(TEMPLATE_PROPERTY_LIMIT);
    ordered
}

/// A complete document for `class`, with the name as the first tab stop.
pub fn class_template(schema: &dyn SchemaStore, class: &str) -> String {
    let mut stops = Placeholders::starting_at(1);
    let class_text = escape_snippet(class);
    let name = stops.placeholder(class);

    let properties: Vec<String> = template_properties(schema, class)
        .into_iter()
        .map(|property| {
            let ty = schema.expected_type(class, &property.name);
            let snippet =
                property_snippet(&property.name, ty.as_deref(), enum_name(property), &mut stops, 2);
            format!("\t\t{snippet}")
        })
        .collect();

    let body = if properties.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n\t}}", properties.join(",\n"))
    };

    format!("{{\n\t\"className\": \"{class_text}\",\n\t\"name\": \"{name}\",\n\t\"properties\": {body}\n}}")
}
