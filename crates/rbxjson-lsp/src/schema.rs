//! Read-only class, property and enum metadata.
//!
//! The classifier and completion generator consume a [`SchemaStore`];
//! [`MemorySchema`] is the implementation loaded from a JSON file at
//! startup.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Category of a property's value type, as reported by the engine API dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TypeCategory {
    Primitive,
    DataType,
    Enum,
    Class,
    Group,
    #[serde(other)]
    Other,
}

/// The declared value type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValueType {
    pub name: String,
    pub category: TypeCategory,
}

/// A property of a class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub name: String,
    pub value_type: ValueType,
    /// Class that declares the property; filled in on load.
    #[serde(default)]
    pub defined_in: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub serializable: bool,
}

fn default_true() -> bool {
    true
}

/// A class and the properties it declares itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
}

/// One member of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumItem {
    pub name: String,
    pub value: i64,
}

/// An enum and its members in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumInfo {
    pub name: String,
    #[serde(default)]
    pub items: Vec<EnumItem>,
}

/// Lookups over class, property and enum metadata.
///
/// Implementations are immutable after construction and shared across
/// requests.
pub trait SchemaStore: Send + Sync {
    /// Every class name, sorted.
    fn all_class_names(&self) -> Vec<&str>;

    fn class_info(&self, name: &str) -> Option<&ClassInfo>;

    /// Ancestors of `name` ordered root first, ending with `name` itself.
    /// Empty for an unknown class.
    fn inheritance_chain(&self, name: &str) -> Vec<&str>;

    /// Serializable properties of `class`, its own first, then each
    /// ancestor's. A name shadowed lower in the chain appears once.
    fn serializable_properties(&self, class: &str) -> Vec<&PropertyInfo>;

    /// The property named `property` on `class` or one of its ancestors.
    fn property_info(&self, class: &str, property: &str) -> Option<&PropertyInfo>;

    /// Every enum name, sorted.
    fn all_enum_names(&self) -> Vec<&str>;

    /// Members of `name` in declared order; empty for an unknown enum.
    fn enum_values(&self, name: &str) -> &[EnumItem];

    /// The canonical `type` tag a property is serialized under.
    ///
    /// Enum-valued properties map to `"Enum"` and instance references to
    /// `"Ref"`; other names go through the dump's aliases.
    fn expected_type(&self, class: &str, property: &str) -> Option<String> {
        let info = self.property_info(class, property)?;
        Some(canonical_type(&info.value_type).to_string())
    }
}

/// Map a dump value type to its canonical serialized tag.
pub fn canonical_type(value_type: &ValueType) -> &str {
    match value_type.category {
        TypeCategory::Enum => "Enum",
        TypeCategory::Class => "Ref",
        _ => match value_type.name.as_str() {
            "CoordinateFrame" => "CFrame",
            "ContentId" | "Content" => "Content",
            "OptionalCoordinateFrame" => "OptionalCFrame",
            other => other,
        },
    }
}

/// Error loading a schema file.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    classes: Vec<ClassInfo>,
    #[serde(default)]
    enums: Vec<EnumInfo>,
}

/// An in-memory [`SchemaStore`].
///
/// The JSON format is
/// `{"classes": [{name, superclass, tags, properties: [...]}], "enums": [{name, items: [{name, value}]}]}`
/// where each property is
/// `{name, valueType: {name, category}, category, defaultValue, tags, serializable}`.
#[derive(Debug, Clone, Default)]
pub struct MemorySchema {
    classes: BTreeMap<String, ClassInfo>,
    enums: BTreeMap<String, EnumInfo>,
}

impl MemorySchema {
    /// A schema with no classes or enums.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(source: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema = serde_json::from_str(source)?;

        let classes = raw
            .classes
            .into_iter()
            .map(|mut class| {
                for property in &mut class.properties {
                    property.defined_in = class.name.clone();
                }
                (class.name.clone(), class)
            })
            .collect();
        let enums = raw
            .enums
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect();

        let schema = Self { classes, enums };
        debug!(
            classes = schema.classes.len(),
            enums = schema.enums.len(),
            "built schema"
        );
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = Self::from_json_str(&source)?;
        info!(?path, classes = schema.classes.len(), "Loaded schema");
        Ok(schema)
    }

    /// Classes from `name` up to the root, stopping at unknown names or cycles.
    fn ancestry(&self, name: &str) -> Vec<&ClassInfo> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.classes.get(name);
        while let Some(class) = current {
            if !seen.insert(class.name.as_str()) {
                break;
            }
            chain.push(class);
            current = class
                .superclass
                .as_deref()
                .and_then(|parent| self.classes.get(parent));
        }
        chain
    }
}

impl SchemaStore for MemorySchema {
    fn all_class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    fn class_info(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    fn inheritance_chain(&self, name: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = self
            .ancestry(name)
            .into_iter()
            .map(|class| class.name.as_str())
            .collect();
        chain.reverse();
        chain
    }

    fn serializable_properties(&self, class: &str) -> Vec<&PropertyInfo> {
        let mut seen = HashSet::new();
        self.ancestry(class)
            .into_iter()
            .flat_map(|class| class.properties.iter())
            .filter(|property| property.serializable)
            .filter(|property| seen.insert(property.name.as_str()))
            .collect()
    }

    fn property_info(&self, class: &str, property: &str) -> Option<&PropertyInfo> {
        self.ancestry(class)
            .into_iter()
            .find_map(|class| class.properties.iter().find(|p| p.name == property))
    }

    fn all_enum_names(&self) -> Vec<&str> {
        self.enums.keys().map(String::as_str).collect()
    }

    fn enum_values(&self, name: &str) -> &[EnumItem] {
        self.enums
            .get(name)
            .map(|e| e.items.as_slice())
            .unwrap_or_default()
    }
}
