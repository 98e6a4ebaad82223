//! Node types for rbxjson documents.
//!
//! A parsed document is a tree of [`Node`]s. Every node carries its byte
//! span in the source, and containers own their children. Objects hold
//! [`NodeKind::Property`] children, each of which owns a key node and (when
//! one was parsed) a value node.

use std::fmt;

use rbxjson_tokenizer::Span;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Source span.
    pub span: Span,
    /// Whether the node was terminated (closing quote, brace or bracket).
    pub closed: bool,
}

/// The kind of a node, with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `{ ... }`; every child is a [`NodeKind::Property`].
    Object(Vec<Node>),
    /// `[ ... ]`
    Array(Vec<Node>),
    /// A string with escapes decoded.
    String(String),
    /// A number.
    Number(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// A `"key": value` pair inside an object.
    Property(Box<Property>),
}

/// A property inside an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The key, always a string node.
    pub key: Node,
    /// Byte offset of the `:` separator, if one was typed.
    pub colon: Option<u32>,
    /// The value, if one could be parsed.
    pub value: Option<Node>,
}

impl Property {
    /// The decoded key text.
    pub fn key_text(&self) -> &str {
        self.key.as_str().unwrap_or_default()
    }
}

/// One step of the path from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl PathSegment {
    /// The key, if this segment is one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The result of locating an offset in the tree.
#[derive(Debug, Clone)]
pub struct Location<'a> {
    /// The deepest node containing the offset.
    pub node: &'a Node,
    /// Keys and indices from the root down to `node`.
    pub path: Vec<PathSegment>,
    /// The offset is inside a property key.
    pub on_key: bool,
    /// The offset is after a property's colon where no value was parsed.
    pub in_value_slot: bool,
}

impl Node {
    /// Whether this is an object.
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array(_))
    }

    /// Whether this is a string.
    pub fn is_string(&self) -> bool {
        matches!(self.kind, NodeKind::String(_))
    }

    /// The string payload, if this is a string node.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::String(text) => Some(text),
            _ => None,
        }
    }

    /// The property payload, if this is a property node.
    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            NodeKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Direct children, in source order.
    ///
    /// A property's children are its key followed by its value.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Object(children) | NodeKind::Array(children) => children.iter().collect(),
            NodeKind::Property(property) => std::iter::once(&property.key)
                .chain(property.value.as_ref())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Iterate over the properties of an object node.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        let children: &[Node] = match &self.kind {
            NodeKind::Object(children) => children,
            _ => &[],
        };
        children.iter().filter_map(Node::as_property)
    }

    /// The value of the first property named `key` that has a value.
    pub fn child_by_key(&self, key: &str) -> Option<&Node> {
        self.properties()
            .filter(|property| property.key_text() == key)
            .find_map(|property| property.value.as_ref())
    }

    /// The array element at `index`.
    pub fn child_at(&self, index: usize) -> Option<&Node> {
        match &self.kind {
            NodeKind::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Follow a chain of object keys from this node.
    ///
    /// `root.lookup(&["properties", "Size", "type"])` returns the `type`
    /// value node of the `Size` property, if every step exists.
    pub fn lookup(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter()
            .try_fold(self, |node, key| node.child_by_key(key))
    }

    /// Like [`Node::lookup`] but returns the string payload of the target.
    pub fn lookup_str(&self, keys: &[&str]) -> Option<&str> {
        self.lookup(keys).and_then(Node::as_str)
    }

    /// Find the deepest node containing `offset`.
    ///
    /// The right boundary is inclusive, so a cursor right after the last
    /// character of a token (including right after an opening quote of an
    /// unterminated string) is still inside it. Descending into a property's
    /// key or value appends the key to the path, descending into an array
    /// element appends its index. A cursor in the value slot of a property
    /// (after its colon, where no value was parsed) also gets the key
    /// appended.
    pub fn locate(&self, offset: u32) -> Option<Location<'_>> {
        if !self.span.contains(offset, true) {
            return None;
        }

        let mut node = self;
        let mut path = Vec::new();
        let mut on_key = false;
        let mut in_value_slot = false;

        loop {
            match &node.kind {
                NodeKind::Object(children) => {
                    match children.iter().find(|c| c.span.contains(offset, true)) {
                        Some(child) => node = child,
                        None => break,
                    }
                }
                NodeKind::Array(items) => {
                    match items
                        .iter()
                        .enumerate()
                        .find(|(_, item)| item.span.contains(offset, true))
                    {
                        Some((index, item)) => {
                            path.push(PathSegment::Index(index));
                            node = item;
                        }
                        None => break,
                    }
                }
                NodeKind::Property(property) => {
                    let key = PathSegment::Key(property.key_text().to_string());
                    if property.key.span.contains(offset, true) {
                        path.push(key);
                        node = &property.key;
                        on_key = true;
                        break;
                    }
                    if let Some(value) = &property.value
                        && value.span.contains(offset, true)
                    {
                        path.push(key);
                        node = value;
                        continue;
                    }
                    if property.colon.is_some_and(|colon| offset > colon) {
                        path.push(key);
                        in_value_slot = true;
                    }
                    break;
                }
                _ => break,
            }
        }

        Some(Location {
            node,
            path,
            on_key,
            in_value_slot,
        })
    }

    /// Convert to a [`serde_json::Value`].
    ///
    /// Properties without a value are skipped; with duplicate keys the last
    /// one wins.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match &self.kind {
            NodeKind::Object(_) => Value::Object(
                self.properties()
                    .filter_map(|p| {
                        p.value
                            .as_ref()
                            .map(|v| (p.key_text().to_string(), v.to_json()))
                    })
                    .collect(),
            ),
            NodeKind::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            NodeKind::String(text) => Value::String(text.clone()),
            NodeKind::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    Value::from(*n)
                }
            }
            NodeKind::Boolean(b) => Value::Bool(*b),
            NodeKind::Null => Value::Null,
            NodeKind::Property(property) => property
                .value
                .as_ref()
                .map(Node::to_json)
                .unwrap_or(Value::Null),
        }
    }
}
