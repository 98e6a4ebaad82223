//! Cursor-marker documents.
//!
//! ```ignore
//! use rbxjson_lsp::testing::TestDocument;
//!
//! let doc = TestDocument::new("file:///part.rbxjson", r#"{"className": "Pa|"}"#);
//! assert_eq!(doc.cursor.unwrap().offset, 17);
//! ```

use crate::analyzer::{DocumentContext, analyze};

/// A document for testing, with optional cursor position.
#[derive(Debug, Clone)]
pub struct TestDocument {
    /// Document URI.
    pub uri: String,
    /// Source text (with cursor marker removed).
    pub source: String,
    /// Cursor position (from `|` marker).
    pub cursor: Option<Cursor>,
}

/// Cursor position information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: u32,
    pub character: u32,
}

impl TestDocument {
    /// Create a new test document from source.
    ///
    /// If the source contains `|`, it marks the cursor position and is removed.
    pub fn new(uri: impl Into<String>, source: impl Into<String>) -> Self {
        let mut source = source.into();

        let cursor = source.find('|').map(|pos| {
            source.remove(pos);

            let before = &source[..pos];
            let line = before.matches('\n').count() as u32;
            let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
            Cursor {
                offset: pos,
                line,
                character: before[line_start..].chars().count() as u32,
            }
        });

        Self {
            uri: uri.into(),
            source,
            cursor,
        }
    }

    /// Cursor offset, or the end of the document when no marker was given.
    pub fn offset(&self) -> usize {
        self.cursor.map_or(self.source.len(), |c| c.offset)
    }
}

/// Classify the `|` position in `source`.
pub fn context_at(source: &str) -> DocumentContext {
    let doc = TestDocument::new("file:///test.rbxjson", source);
    analyze(&doc.source, doc.offset())
}
