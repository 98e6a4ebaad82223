//! Tokenizer for rbxjson documents.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from rbxjson source text.
///
/// The tokenizer never fails: anything it cannot make sense of becomes an
/// [`TokenKind::Error`] or [`TokenKind::Word`] token and scanning continues.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '"' => self.tokenize_string(),
            '/' if self.starts_with("//") => self.tokenize_line_comment(),
            '/' if self.starts_with("/*") => self.tokenize_block_comment(),
            ' ' | '\t' => self.tokenize_whitespace(),
            '\n' => self.single(TokenKind::Newline),
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                self.token(TokenKind::Newline, start)
            }
            _ if is_word_char(c) => self.tokenize_word(),
            _ => self.single(TokenKind::Error),
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    fn tokenize_whitespace(&mut self) -> Token<'src> {
        let start = self.pos;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
        self.token(TokenKind::Whitespace, start)
    }

    /// Tokenize a bare run such as `true`, `0.5` or a half-typed key.
    fn tokenize_word(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_word_char(c) || self.starts_with("//") || self.starts_with("/*") {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::Word, start)
    }

    /// Tokenize a quoted string: `"..."`.
    ///
    /// A string that hits a line break or EOF before its closing quote is
    /// returned as [`TokenKind::UnterminatedString`] without the line break.
    fn tokenize_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Opening quote
        self.advance();

        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return self.token(TokenKind::UnterminatedString, start);
                }
                Some('"') => {
                    self.advance();
                    return self.token(TokenKind::String, start);
                }
                Some('\\') => {
                    self.advance();
                    if !matches!(self.peek(), None | Some('\n') | Some('\r')) {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn tokenize_line_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::LineComment, start)
    }

    /// Tokenize `/* ... */`; an unterminated comment runs to EOF.
    fn tokenize_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.advance();
        while !self.is_eof() {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.token(TokenKind::BlockComment, start)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Characters that can appear in a bare word.
fn is_word_char(c: char) -> bool {
    !matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | '"') && !c.is_whitespace()
}
