//! Static tables: struct layouts, class priorities and curated suggestions.
//!
//! Struct field names and order mirror the serialized form of each value
//! type, so they double as the canonical order for value skeletons.

use rbxjson_tree::PathSegment;

/// How a struct field's value is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A number, with its default literal.
    Number(&'static str),
    /// A boolean, defaulting to `false`.
    Bool,
    /// A string, with its default content (may be empty).
    Text(&'static str),
    /// A nested struct of the given type.
    Struct(&'static str),
    /// A nested struct with positional defaults for its numeric leaves.
    StructWith(&'static str, &'static [&'static str]),
    /// A fixed-length numeric array; one placeholder per element.
    Numbers(&'static [&'static str]),
    /// Literal JSON inserted as-is.
    Literal(&'static str),
    /// An array of keypoints of the given keypoint type.
    Keypoints(&'static str),
    /// Keypoint time: `0` for the first keypoint, `1` for the last.
    Time,
}

/// One field of a struct value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructField {
    pub name: &'static str,
    pub description: &'static str,
    pub shape: FieldShape,
}

const fn field(name: &'static str, description: &'static str, shape: FieldShape) -> StructField {
    StructField {
        name,
        description,
        shape,
    }
}

use FieldShape::*;

static VECTOR2: [StructField; 2] = [
    field("x", "X component (f32)", Number("0")),
    field("y", "Y component (f32)", Number("0")),
];
static VECTOR2INT16: [StructField; 2] = [
    field("x", "X component (i16)", Number("0")),
    field("y", "Y component (i16)", Number("0")),
];
static VECTOR3: [StructField; 3] = [
    field("x", "X component (f32)", Number("0")),
    field("y", "Y component (f32)", Number("0")),
    field("z", "Z component (f32)", Number("0")),
];
static VECTOR3INT16: [StructField; 3] = [
    field("x", "X component (i16)", Number("0")),
    field("y", "Y component (i16)", Number("0")),
    field("z", "Z component (i16)", Number("0")),
];
static CFRAME: [StructField; 2] = [
    field("position", "Position array [x, y, z]", Numbers(&["0", "0", "0"])),
    field(
        "rotation",
        "Rotation matrix [9 floats]",
        Literal("[1, 0, 0, 0, 1, 0, 0, 0, 1]"),
    ),
];
static COLOR3: [StructField; 3] = [
    field("r", "Red (0.0-1.0)", Number("1")),
    field("g", "Green (0.0-1.0)", Number("1")),
    field("b", "Blue (0.0-1.0)", Number("1")),
];
static COLOR3UINT8: [StructField; 3] = [
    field("r", "Red (0-255)", Number("255")),
    field("g", "Green (0-255)", Number("255")),
    field("b", "Blue (0-255)", Number("255")),
];
static UDIM: [StructField; 2] = [
    field("scale", "Scale factor (f32)", Number("0")),
    field("offset", "Pixel offset (i32)", Number("0")),
];
static UDIM2: [StructField; 2] = [
    field("x", "X dimension (UDim object)", Struct("UDim")),
    field("y", "Y dimension (UDim object)", Struct("UDim")),
];
static RECT: [StructField; 2] = [
    field("min", "Min corner (Vector2 object)", Struct("Vector2")),
    field("max", "Max corner (Vector2 object)", Struct("Vector2")),
];
static NUMBER_RANGE: [StructField; 2] = [
    field("min", "Minimum value (f32)", Number("0")),
    field("max", "Maximum value (f32)", Number("1")),
];
static NUMBER_SEQUENCE: [StructField; 1] = [field(
    "keypoints",
    "Array of {time, value, envelope}",
    Keypoints("NumberSequenceKeypoint"),
)];
static NUMBER_SEQUENCE_KEYPOINT: [StructField; 3] = [
    field("time", "Keypoint time (0.0-1.0)", Time),
    field("value", "Value at this keypoint (f32)", Number("0")),
    field("envelope", "Random variance (f32)", Number("0")),
];
static COLOR_SEQUENCE: [StructField; 1] = [field(
    "keypoints",
    "Array of {time, color}",
    Keypoints("ColorSequenceKeypoint"),
)];
static COLOR_SEQUENCE_KEYPOINT: [StructField; 2] = [
    field("time", "Keypoint time (0.0-1.0)", Time),
    field("color", "Color at this keypoint (Color3 object)", Struct("Color3")),
];
static SHARED_STRING: [StructField; 2] = [
    field("hash", "Content hash", Text("")),
    field("file", "Optional file path", Text("")),
];
static FONT: [StructField; 3] = [
    field(
        "family",
        "Font family name",
        Text("rbxasset://fonts/families/SourceSansPro.json"),
    ),
    field("weight", "Font weight", Text("Regular")),
    field("style", "Font style", Text("Normal")),
];
static FACES: [StructField; 6] = [
    field("top", "Top face (bool)", Bool),
    field("bottom", "Bottom face (bool)", Bool),
    field("left", "Left face (bool)", Bool),
    field("right", "Right face (bool)", Bool),
    field("front", "Front face (bool)", Bool),
    field("back", "Back face (bool)", Bool),
];
static AXES: [StructField; 3] = [
    field("x", "X axis enabled (bool)", Bool),
    field("y", "Y axis enabled (bool)", Bool),
    field("z", "Z axis enabled (bool)", Bool),
];
static PHYSICAL_PROPERTIES: [StructField; 5] = [
    field("density", "Material density (f32)", Number("1")),
    field("friction", "Surface friction (f32)", Number("0.3")),
    field("elasticity", "Bounciness (f32)", Number("0.5")),
    field("friction_weight", "Friction blend weight (f32)", Number("1")),
    field("elasticity_weight", "Elasticity blend weight (f32)", Number("1")),
];
static RAY: [StructField; 2] = [
    field("origin", "Ray origin (Vector3 object)", Struct("Vector3")),
    field(
        "direction",
        "Ray direction (Vector3 object)",
        StructWith("Vector3", &["0", "1", "0"]),
    ),
];
static REGION3: [StructField; 2] = [
    field("min", "Min corner (Vector3 object)", Struct("Vector3")),
    field(
        "max",
        "Max corner (Vector3 object)",
        StructWith("Vector3", &["1", "1", "1"]),
    ),
];
static REGION3INT16: [StructField; 2] = [
    field("min", "Min corner (Vector3int16 object)", Struct("Vector3int16")),
    field(
        "max",
        "Max corner (Vector3int16 object)",
        StructWith("Vector3int16", &["1", "1", "1"]),
    ),
];
static ENUM: [StructField; 2] = [
    field("enumType", "Enum type name", Text("")),
    field("value", "Enum value name", Text("")),
];

/// Canonical name and field layout of a struct value type.
pub fn struct_layout(ty: &str) -> Option<(&'static str, &'static [StructField])> {
    let layout: (&'static str, &'static [StructField]) = match ty {
        "Vector2" => ("Vector2", &VECTOR2),
        "Vector2int16" => ("Vector2int16", &VECTOR2INT16),
        "Vector3" => ("Vector3", &VECTOR3),
        "Vector3int16" => ("Vector3int16", &VECTOR3INT16),
        "CFrame" => ("CFrame", &CFRAME),
        "OptionalCFrame" => ("OptionalCFrame", &CFRAME),
        "Color3" => ("Color3", &COLOR3),
        "Color3uint8" => ("Color3uint8", &COLOR3UINT8),
        "UDim" => ("UDim", &UDIM),
        "UDim2" => ("UDim2", &UDIM2),
        "Rect" => ("Rect", &RECT),
        "NumberRange" => ("NumberRange", &NUMBER_RANGE),
        "NumberSequence" => ("NumberSequence", &NUMBER_SEQUENCE),
        "NumberSequenceKeypoint" => ("NumberSequenceKeypoint", &NUMBER_SEQUENCE_KEYPOINT),
        "ColorSequence" => ("ColorSequence", &COLOR_SEQUENCE),
        "ColorSequenceKeypoint" => ("ColorSequenceKeypoint", &COLOR_SEQUENCE_KEYPOINT),
        "SharedString" => ("SharedString", &SHARED_STRING),
        "Font" => ("Font", &FONT),
        "Faces" => ("Faces", &FACES),
        "Axes" => ("Axes", &AXES),
        "PhysicalProperties" => ("PhysicalProperties", &PHYSICAL_PROPERTIES),
        "Ray" => ("Ray", &RAY),
        "Region3" => ("Region3", &REGION3),
        "Region3int16" => ("Region3int16", &REGION3INT16),
        "Enum" => ("Enum", &ENUM),
        _ => return None,
    };
    Some(layout)
}

/// Fields of a struct value type.
pub fn struct_fields(ty: &str) -> Option<&'static [StructField]> {
    struct_layout(ty).map(|(_, fields)| fields)
}

/// Whether `ty` is a struct value type (its value is an object of fields).
pub fn is_struct(ty: &str) -> bool {
    ty != "Enum" && struct_layout(ty).is_some()
}

/// Types whose value must be a scalar literal.
pub static PRIMITIVE_TYPES: &[&str] = &[
    "bool",
    "int",
    "int64",
    "float",
    "double",
    "string",
    "Content",
    "ProtectedString",
    "BinaryString",
    "BrickColor",
    "SecurityCapabilities",
    "UniqueId",
    "Ref",
];

pub fn is_primitive(ty: &str) -> bool {
    PRIMITIVE_TYPES.contains(&ty)
}

/// Every canonical `type` tag other than `Enum` and `Ref`.
pub static PROPERTY_TYPES: &[&str] = &[
    "bool",
    "int",
    "int64",
    "float",
    "double",
    "string",
    "Vector2",
    "Vector2int16",
    "Vector3",
    "Vector3int16",
    "CFrame",
    "Color3",
    "Color3uint8",
    "BrickColor",
    "UDim",
    "UDim2",
    "Rect",
    "NumberSequence",
    "ColorSequence",
    "NumberRange",
    "Content",
    "BinaryString",
    "SharedString",
    "Font",
    "Faces",
    "Axes",
    "PhysicalProperties",
    "Ray",
    "Region3",
    "Region3int16",
    "ProtectedString",
    "OptionalCFrame",
    "UniqueId",
    "SecurityCapabilities",
];

/// Where a path below a property's `value` lands inside its struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructTarget {
    /// Inside an object of this struct type, naming its fields.
    Struct(&'static str),
    /// On a scalar leaf or inside a numeric array.
    Leaf,
    /// The path does not fit the layout.
    Unknown,
}

/// Walk `path` (segments below `value`) through the layout of `ty`.
pub fn resolve_struct_path(ty: &str, path: &[PathSegment]) -> StructTarget {
    enum At {
        Struct(&'static str),
        Keypoints(&'static str),
        Array,
        Leaf,
    }

    let Some((name, _)) = struct_layout(ty) else {
        return StructTarget::Unknown;
    };
    let mut at = At::Struct(name);

    for segment in path {
        at = match (at, segment) {
            (At::Struct(current), PathSegment::Key(key)) => {
                let Some(field) = struct_fields(current)
                    .and_then(|fields| fields.iter().find(|f| f.name == key))
                else {
                    return StructTarget::Unknown;
                };
                match field.shape {
                    Struct(inner) | StructWith(inner, _) => At::Struct(inner),
                    Keypoints(keypoint) => At::Keypoints(keypoint),
                    Numbers(_) | Literal(_) => At::Array,
                    Number(_) | Bool | Text(_) | Time => At::Leaf,
                }
            }
            (At::Keypoints(keypoint), PathSegment::Index(_)) => At::Struct(keypoint),
            (At::Array, PathSegment::Index(_)) => At::Leaf,
            _ => return StructTarget::Unknown,
        };
    }

    match at {
        At::Struct(name) => StructTarget::Struct(name),
        At::Keypoints(_) | At::Array | At::Leaf => StructTarget::Leaf,
    }
}

/// Properties listed first in a class template, in this order.
pub fn priority_properties(class: &str) -> &'static [&'static str] {
    match class {
        "Part" => &[
            "Anchored",
            "CanCollide",
            "Size",
            "CFrame",
            "Color",
            "Material",
            "Transparency",
            "Shape",
        ],
        "MeshPart" => &[
            "Anchored",
            "CanCollide",
            "Size",
            "CFrame",
            "Color",
            "Material",
            "Transparency",
            "MeshId",
            "TextureID",
        ],
        "Script" | "LocalScript" => &["Disabled"],
        "Frame" => &[
            "Size",
            "Position",
            "AnchorPoint",
            "BackgroundColor3",
            "BackgroundTransparency",
            "BorderSizePixel",
            "Visible",
        ],
        "TextLabel" => &[
            "Text",
            "TextColor3",
            "TextSize",
            "Font",
            "Size",
            "Position",
            "BackgroundTransparency",
        ],
        "TextButton" => &[
            "Text",
            "TextColor3",
            "TextSize",
            "Font",
            "Size",
            "Position",
            "BackgroundColor3",
        ],
        "ImageLabel" | "ImageButton" => &[
            "Image",
            "Size",
            "Position",
            "BackgroundTransparency",
            "ImageColor3",
        ],
        "Sound" => &["SoundId", "Volume", "Looped", "PlayOnRemove"],
        "ScreenGui" => &["ResetOnSpawn", "IgnoreGuiInset", "ZIndexBehavior"],
        "Model" => &["PrimaryPart"],
        _ => &[],
    }
}

/// Classes offered as full-document templates at the root.
pub static TEMPLATE_CLASSES: &[&str] = &[
    "Part",
    "Script",
    "LocalScript",
    "ModuleScript",
    "Folder",
    "Model",
    "Frame",
    "TextLabel",
    "TextButton",
    "Sound",
    "ScreenGui",
];

/// Frequently used classes, sorted ahead of the rest in `className` lists.
pub static COMMON_CLASSES: &[&str] = &[
    "Part",
    "Script",
    "LocalScript",
    "ModuleScript",
    "Folder",
    "Model",
    "Frame",
    "TextLabel",
    "TextButton",
    "ImageLabel",
    "Sound",
    "ScreenGui",
    "BillboardGui",
    "RemoteEvent",
    "RemoteFunction",
    "BindableEvent",
    "BindableFunction",
    "StringValue",
    "NumberValue",
    "BoolValue",
];

/// Root-level keys: name, detail, snippet, required.
pub static ROOT_KEYS: &[(&str, &str, &str, bool)] = &[
    ("className", "Roblox class name", "\"className\": \"${1:Part}\"", true),
    ("name", "Instance name", "\"name\": \"${1}\"", true),
    (
        "referenceId",
        "Unique identifier (UUID)",
        "\"referenceId\": \"${1}\"",
        false,
    ),
    ("path", "Instance path in tree", "\"path\": \"${1}\"", false),
    (
        "properties",
        "Instance properties",
        "\"properties\": {\n\t$0\n}",
        false,
    ),
    (
        "attributes",
        "Custom attributes",
        "\"attributes\": {\n\t$0\n}",
        false,
    ),
    ("tags", "CollectionService tags", "\"tags\": [$0]", false),
];

/// Serialized-as-something-else types: name, serialized type, description.
pub static ORIGINAL_TYPES: &[(&str, &str, &str)] = &[
    (
        "ContentId",
        "string",
        "Asset URL reference (rbxassetid://)",
    ),
    ("BinaryString", "string", "Binary data as base64 string"),
    ("ProtectedString", "string", "Script source code"),
    (
        "OptionalCoordinateFrame",
        "CFrame",
        "Optional CFrame (can be null)",
    ),
    ("SharedString", "string", "Shared content reference"),
    ("QDir", "string", "Directory path"),
    ("QFont", "Font", "Font specification"),
];

/// Common attribute names.
pub static ATTRIBUTE_KEYS: &[(&str, &str)] = &[
    ("Health", "Numeric health value"),
    ("MaxHealth", "Maximum health value"),
    ("Speed", "Movement speed"),
    ("Damage", "Damage value"),
    ("Level", "Level/tier value"),
    ("Cost", "Price/cost value"),
    ("Enabled", "Boolean toggle"),
    ("Locked", "Boolean lock state"),
    ("ID", "Unique identifier"),
    ("Type", "Type classification"),
    ("Name", "Display name"),
    ("Description", "Text description"),
];

/// Attribute value shapes: label, literal, detail.
pub static ATTRIBUTE_VALUES: &[(&str, &str, &str)] = &[
    ("string", "\"\"", "String value"),
    ("number", "0", "Numeric value"),
    ("boolean", "true", "Boolean value"),
    ("Vector3", "{ \"x\": 0, \"y\": 0, \"z\": 0 }", "Vector3 value"),
    ("Color3", "{ \"r\": 1, \"g\": 1, \"b\": 1 }", "Color3 value"),
    ("UDim", "{ \"scale\": 0, \"offset\": 0 }", "UDim value"),
    (
        "UDim2",
        "{ \"x\": { \"scale\": 0, \"offset\": 0 }, \"y\": { \"scale\": 0, \"offset\": 0 } }",
        "UDim2 value",
    ),
];

/// Common CollectionService tags.
pub static TAGS: &[(&str, &str)] = &[
    ("Interactable", "Can be interacted with"),
    ("Collectable", "Can be collected by player"),
    ("Damageable", "Can take damage"),
    ("NPC", "Non-player character"),
    ("Enemy", "Hostile entity"),
    ("Player", "Player-related object"),
    ("Checkpoint", "Spawn/save point"),
    ("Trigger", "Trigger zone"),
    ("Spawner", "Object spawner"),
    ("Destructible", "Can be destroyed"),
    ("Teleporter", "Teleport zone"),
    ("Door", "Door/gate object"),
    ("Animated", "Has animations"),
    ("Sound", "Sound emitter"),
    ("Effect", "Visual effect"),
];
