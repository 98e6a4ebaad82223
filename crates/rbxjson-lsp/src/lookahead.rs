//! Lexical detection of `"enumType":` and `"value":` slots.
//!
//! Right after such a colon there is no value token yet, so the tree has
//! nothing to locate. These checks look at the raw text immediately before
//! the cursor instead, and run before any tree-based classification.

use std::sync::LazyLock;

use regex::Regex;

/// How far back from the cursor the lexical checks look, in bytes.
const WINDOW: usize = 100;

static ENUM_TYPE_SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""enumType"\s*:\s*([A-Za-z0-9_]*)$"#).unwrap());

static VALUE_SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""value"\s*:\s*([A-Za-z0-9_]*)$"#).unwrap());

/// Key of the innermost object holding the slot.
static ENCLOSING_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([A-Za-z][A-Za-z0-9_]*)"\s*:\s*\{[^{}]*"(?:enumType|value)"\s*:\s*[A-Za-z0-9_]*$"#)
        .unwrap()
});

/// Key of the property whose `value` object holds the slot.
static OWNING_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""([A-Za-z][A-Za-z0-9_]*)"\s*:\s*\{[^{}]*"value"\s*:\s*\{[^{}]*"(?:enumType|value)"\s*:\s*[A-Za-z0-9_]*$"#,
    )
    .unwrap()
});

/// An `enumType` string typed earlier in the same object.
static SIBLING_ENUM_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""enumType"\s*:\s*"([^"]*)"[^{}]*"value"\s*:\s*[A-Za-z0-9_]*$"#).unwrap()
});

/// Which slot the cursor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    EnumType,
    Value,
}

/// A lexically detected slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch {
    pub slot: Slot,
    /// Bare word typed after the colon so far.
    pub word: String,
    /// Key of the innermost enclosing object, if visible in the window.
    pub enclosing_key: Option<String>,
    /// Property owning the enclosing `value` object, when the slot is
    /// nested one level inside a property value.
    pub owning_property: Option<String>,
    /// `enumType` given earlier in the same object, for `value` slots.
    pub sibling_enum_type: Option<String>,
}

impl SlotMatch {
    /// The slot sits inside a property's `value` object (an enum value).
    pub fn is_nested_in_value(&self) -> bool {
        self.enclosing_key.as_deref() == Some("value")
    }
}

/// Check whether the text before `offset` ends in an empty (or partially
/// typed) `"enumType":` or `"value":` slot.
pub fn detect(text: &str, offset: usize) -> Option<SlotMatch> {
    let window = window_before(text, offset);

    let (slot, caps) = if let Some(caps) = ENUM_TYPE_SLOT_RE.captures(window) {
        (Slot::EnumType, caps)
    } else {
        (Slot::Value, VALUE_SLOT_RE.captures(window)?)
    };

    let capture = |re: &Regex| {
        re.captures(window)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    Some(SlotMatch {
        slot,
        word: caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        enclosing_key: capture(&ENCLOSING_KEY_RE),
        owning_property: capture(&OWNING_PROPERTY_RE),
        sibling_enum_type: match slot {
            Slot::Value => capture(&SIBLING_ENUM_TYPE_RE),
            Slot::EnumType => None,
        },
    })
}

/// Up to [`WINDOW`] bytes before `offset`, starting on a char boundary.
fn window_before(text: &str, offset: usize) -> &str {
    let end = offset.min(text.len());
    let mut start = end.saturating_sub(WINDOW);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..end]
}
