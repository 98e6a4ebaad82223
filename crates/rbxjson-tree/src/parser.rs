//! Tolerant parser producing a [`Node`] tree.
//!
//! The parser never gives up. Anything it cannot make sense of is recorded
//! as a [`ParseError`] and skipped up to the next `,` or closing delimiter,
//! so the tree always holds the deepest still-valid structure. This matters
//! while a document is being typed: the cursor almost always sits in
//! syntactically broken text.

use rbxjson_tokenizer::{Span, Token, TokenKind, Tokenizer};
use tracing::debug;

use crate::node::{Node, NodeKind, Property};

/// A syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// Human-readable message.
    pub message: String,
    /// Byte offset where the error starts.
    pub offset: u32,
    /// Length in bytes of the offending text (may be zero).
    pub len: u32,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            offset: span.start,
            len: span.len(),
        }
    }

    /// The span covered by this error.
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.len)
    }
}

/// The result of parsing a document.
#[derive(Debug, Clone, Default)]
pub struct Parse {
    /// The root value, absent when the document holds no value at all.
    pub root: Option<Node>,
    /// Every error encountered, in source order.
    pub errors: Vec<ParseError>,
}

/// Parse a document.
pub fn parse(source: &str) -> Parse {
    let mut parser = Parser::new(source);
    let root = parser.parse_value();

    match parser.current.kind {
        TokenKind::Eof => {}
        _ if root.is_none() => parser.error("value expected"),
        _ => parser.error("end of file expected"),
    }

    debug!(
        has_root = root.is_some(),
        errors = parser.errors.len(),
        "parsed rbxjson document"
    );

    Parse {
        root,
        errors: parser.errors,
    }
}

struct Parser<'src> {
    tokenizer: Tokenizer<'src>,
    /// Current non-trivia token.
    current: Token<'src>,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        let mut tokenizer = Tokenizer::new(source);
        let current = next_significant(&mut tokenizer);
        Self {
            tokenizer,
            current,
            errors: Vec::new(),
        }
    }

    /// Consume the current token and move to the next non-trivia one.
    fn bump(&mut self) -> Token<'src> {
        let next = next_significant(&mut self.tokenizer);
        std::mem::replace(&mut self.current, next)
    }

    fn error(&mut self, message: &str) {
        self.errors.push(ParseError::new(message, self.current.span));
    }

    /// Skip tokens until one of `stop` (or EOF) is current.
    fn skip_until(&mut self, stop: &[TokenKind]) {
        while self.current.kind != TokenKind::Eof && !stop.contains(&self.current.kind) {
            self.bump();
        }
    }

    /// Parse a value at the current token. Returns `None` without consuming
    /// anything if the current token cannot start a value.
    fn parse_value(&mut self) -> Option<Node> {
        match self.current.kind {
            TokenKind::LBrace => Some(self.parse_object()),
            TokenKind::LBracket => Some(self.parse_array()),
            TokenKind::String | TokenKind::UnterminatedString => Some(self.parse_string()),
            TokenKind::Word => self.parse_literal(),
            _ => None,
        }
    }

    fn parse_string(&mut self) -> Node {
        let token = self.bump();
        let closed = token.kind == TokenKind::String;
        if !closed {
            self.errors
                .push(ParseError::new("unterminated string", token.span));
        }
        Node {
            kind: NodeKind::String(unescape(string_content(token.text, closed))),
            span: token.span,
            closed,
        }
    }

    fn parse_literal(&mut self) -> Option<Node> {
        let text = self.current.text;
        let kind = match text {
            "true" => NodeKind::Boolean(true),
            "false" => NodeKind::Boolean(false),
            "null" => NodeKind::Null,
            _ if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) => {
                match text.parse::<f64>() {
                    Ok(n) if n.is_finite() => NodeKind::Number(n),
                    _ => {
                        self.error("invalid number");
                        return None;
                    }
                }
            }
            _ => {
                self.error("invalid symbol");
                return None;
            }
        };
        let token = self.bump();
        Some(Node {
            kind,
            span: token.span,
            closed: true,
        })
    }

    fn parse_object(&mut self) -> Node {
        let start = self.bump().span.start;
        let mut children = Vec::new();
        let mut needs_comma = false;

        while !matches!(self.current.kind, TokenKind::RBrace | TokenKind::Eof) {
            if self.current.kind == TokenKind::Comma {
                if !needs_comma {
                    self.error("property expected");
                }
                self.bump();
                if self.current.kind == TokenKind::RBrace {
                    // trailing comma
                    break;
                }
            } else if needs_comma {
                self.error("comma expected");
            }

            match self.parse_property() {
                Some(property) => children.push(property),
                None => {
                    self.error("property name expected");
                    self.skip_until(&[TokenKind::RBrace, TokenKind::Comma]);
                }
            }
            needs_comma = true;
        }

        self.finish_container(NodeKind::Object(children), start, TokenKind::RBrace)
    }

    fn parse_property(&mut self) -> Option<Node> {
        if !self.current.kind.is_string() {
            return None;
        }
        let key = self.parse_string();
        let start = key.span.start;
        let mut colon = None;
        let mut value = None;

        if self.current.kind == TokenKind::Colon {
            colon = Some(self.bump().span.start);
            value = self.parse_value();
            if value.is_none() {
                self.error("value expected");
                self.skip_until(&[TokenKind::RBrace, TokenKind::Comma]);
            }
        } else {
            self.error("colon expected");
            self.skip_until(&[TokenKind::RBrace, TokenKind::Comma]);
        }

        let end = match &value {
            Some(value) => value.span.end,
            None => self.current.span.start.max(key.span.end),
        };

        Some(Node {
            kind: NodeKind::Property(Box::new(Property { key, colon, value })),
            span: Span::new(start, end),
            closed: true,
        })
    }

    fn parse_array(&mut self) -> Node {
        let start = self.bump().span.start;
        let mut items = Vec::new();
        let mut needs_comma = false;

        while !matches!(self.current.kind, TokenKind::RBracket | TokenKind::Eof) {
            if self.current.kind == TokenKind::Comma {
                if !needs_comma {
                    self.error("value expected");
                }
                self.bump();
                if self.current.kind == TokenKind::RBracket {
                    break;
                }
            } else if needs_comma {
                self.error("comma expected");
            }

            match self.parse_value() {
                Some(item) => items.push(item),
                None => {
                    self.error("value expected");
                    self.skip_until(&[TokenKind::RBracket, TokenKind::Comma]);
                }
            }
            needs_comma = true;
        }

        self.finish_container(NodeKind::Array(items), start, TokenKind::RBracket)
    }

    /// Consume the closing delimiter if present. An unclosed container ends
    /// where parsing stopped.
    fn finish_container(&mut self, kind: NodeKind, start: u32, close: TokenKind) -> Node {
        if self.current.kind == close {
            let end = self.bump().span.end;
            return Node {
                kind,
                span: Span::new(start, end),
                closed: true,
            };
        }

        self.error(match close {
            TokenKind::RBrace => "closing brace expected",
            _ => "closing bracket expected",
        });
        Node {
            kind,
            span: Span::new(start, self.current.span.start),
            closed: false,
        }
    }
}

fn next_significant<'src>(tokenizer: &mut Tokenizer<'src>) -> Token<'src> {
    loop {
        let token = tokenizer.next_token();
        if !token.kind.is_trivia() {
            return token;
        }
    }
}

/// The text between the quotes of a string token.
fn string_content(text: &str, closed: bool) -> &str {
    let inner = text.strip_prefix('"').unwrap_or(text);
    if closed {
        inner.strip_suffix('"').unwrap_or(inner)
    } else {
        inner
    }
}

/// Decode JSON escapes. Invalid escapes are kept verbatim.
fn unescape(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('/') => result.push('/'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) if hex.len() == 4 => {
                        result.push(ch);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => result.push_str("\\u"),
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathSegment;

    fn messages(source: &str) -> Vec<String> {
        parse(source).errors.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_well_formed_document() {
        let parse = parse(r#"{"className": "Part", "tags": ["a", "b"], "n": -1.5}"#);
        assert!(parse.errors.is_empty());
        let root = parse.root.unwrap();
        assert_eq!(root.lookup_str(&["className"]), Some("Part"));
        assert_eq!(
            root.to_json(),
            serde_json::json!({"className": "Part", "tags": ["a", "b"], "n": -1.5})
        );
    }

    #[test]
    fn test_empty_document_has_no_root() {
        let parse = parse("   // nothing here\n");
        assert!(parse.root.is_none());
        assert!(parse.errors.is_empty());
    }

    #[test]
    fn test_trailing_commas_and_comments() {
        let source = "{\n  // the class\n  \"className\": \"Part\", /* x */\n  \"tags\": [\"a\",],\n}";
        let parse = parse(source);
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        assert_eq!(
            parse.root.unwrap().to_json(),
            serde_json::json!({"className": "Part", "tags": ["a"]})
        );
    }

    #[test]
    fn test_unclosed_object_keeps_partial_tree() {
        let parse = parse(r#"{"className": "Part", "properties": {"Anchored": {"type": "bool""#);
        let root = parse.root.unwrap();
        assert!(!root.closed);
        assert_eq!(
            root.lookup_str(&["properties", "Anchored", "type"]),
            Some("bool")
        );
        assert_eq!(
            messages(r#"{"a": {"b": 1"#),
            vec!["closing brace expected", "closing brace expected"]
        );
    }

    #[test]
    fn test_missing_value_records_colon_slot() {
        let source = r#"{"value": }"#;
        let parse = parse(source);
        assert_eq!(messages(source), vec!["value expected"]);
        let root = parse.root.unwrap();
        let property = root.properties().next().unwrap();
        assert_eq!(property.colon, Some(8));
        assert!(property.value.is_none());

        let location = root.locate(10).unwrap();
        assert_eq!(location.path, vec![PathSegment::Key("value".into())]);
        assert!(location.in_value_slot);
    }

    #[test]
    fn test_junk_is_skipped_to_next_property() {
        let source = r#"{"a": nope, "b": 2}"#;
        assert_eq!(messages(source), vec!["invalid symbol", "value expected"]);
        let root = parse(source).root.unwrap();
        assert_eq!(root.to_json(), serde_json::json!({"b": 2}));
    }

    #[test]
    fn test_missing_comma() {
        let source = r#"{"a": 1 "b": 2}"#;
        assert_eq!(messages(source), vec!["comma expected"]);
        assert_eq!(
            parse(source).root.unwrap().to_json(),
            serde_json::json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn test_unterminated_string() {
        let parse = parse("{\"className\": \"Pa\n}");
        assert_eq!(parse.errors[0].message, "unterminated string");
        let root = parse.root.unwrap();
        let value = root.child_by_key("className").unwrap();
        assert!(!value.closed);
        assert_eq!(value.as_str(), Some("Pa"));
        assert!(root.closed);
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(messages("{} {}"), vec!["end of file expected"]);
    }

    #[test]
    fn test_escapes() {
        let root = parse(r#""a\"b\\cA\q""#).root.unwrap();
        assert_eq!(root.as_str(), Some("a\"b\\cA\\q"));
    }

    #[test]
    fn test_locate_inclusive_right_bound() {
        let source = r#"{"className": ""}"#;
        let root = parse(source).root.unwrap();
        // right after the opening quote of the value
        let location = root.locate(15).unwrap();
        assert!(location.node.is_string());
        assert_eq!(location.path, vec![PathSegment::Key("className".into())]);
        assert!(!location.on_key);
    }

    #[test]
    fn test_locate_on_key_and_array_index() {
        let source = r#"{"tags": ["a", "b"]}"#;
        let root = parse(source).root.unwrap();

        let on_key = root.locate(3).unwrap();
        assert!(on_key.on_key);
        assert_eq!(on_key.path, vec![PathSegment::Key("tags".into())]);

        let second = root.locate(16).unwrap();
        assert_eq!(
            second.path,
            vec![PathSegment::Key("tags".into()), PathSegment::Index(1)]
        );
        assert_eq!(second.node.as_str(), Some("b"));
    }

    #[test]
    fn test_locate_outside_root() {
        let root = parse("  {}").root.unwrap();
        assert!(root.locate(0).is_none());
        assert!(root.locate(2).is_some());
    }
}
