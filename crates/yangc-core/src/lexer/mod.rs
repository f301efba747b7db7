//! YANG lexer module.
//!
//! Tokenizes YANG module source text into a token stream.

mod token;

pub use token::{Location, Span, Token, TokenKind};

use crate::error::Error;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Byte offset into source text.
pub type ByteOffset = u32;

/// YANG lexer.
///
/// Produces a finite token sequence from one source text. The lexer fails
/// hard on malformed input (unterminated strings or block comments); the
/// resulting token stream is otherwise complete, with comments and
/// whitespace stripped. Re-lexing the same text yields the same tokens.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src [u8],
    /// Logical source name for diagnostics.
    source_name: &'src str,
    /// Current byte position.
    pos: usize,
    /// Current line (1-based).
    line: u32,
    /// Current column (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str, source_name: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            source_name,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire source and return all tokens.
    ///
    /// The returned sequence always ends with an [`TokenKind::Eof`] token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_trivia()?;

        let start = self.pos;
        let loc = self.location();

        let Some(b) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start, loc));
        };

        match b {
            b'{' => {
                self.advance();
                Ok(self.token(TokenKind::LBrace, start, loc))
            }
            b'}' => {
                self.advance();
                Ok(self.token(TokenKind::RBrace, start, loc))
            }
            b';' => {
                self.advance();
                Ok(self.token(TokenKind::Semicolon, start, loc))
            }
            b'"' => self.scan_double_quoted(start, loc),
            b'\'' => self.scan_single_quoted(start, loc),
            _ => Ok(self.scan_word(start, loc)),
        }
    }

    /// Current line/column.
    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Peek at the current byte without advancing.
    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    /// Peek at the byte at offset from current position.
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// Advance by one byte and return it, tracking line/column.
    fn advance(&mut self) -> Option<u8> {
        let b = self.source.get(self.pos).copied();
        if let Some(b) = b {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        b
    }

    /// Make a token from start position to current position.
    fn token(&self, kind: TokenKind, start: usize, loc: Location) -> Token {
        Token::new(
            kind,
            Span::new(start as ByteOffset, self.pos as ByteOffset),
            loc,
        )
    }

    /// Build a lex error at the given location.
    fn error(&self, loc: Location, message: &str) -> Error {
        Error::Lex {
            source_name: self.source_name.to_string(),
            loc,
            message: message.to_string(),
        }
    }

    /// Skip whitespace and comments (`//...` and `/*...*/`).
    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let loc = self.location();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(self.error(loc, "unterminated block comment"));
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Scan a double-quoted string literal.
    ///
    /// Escapes are preserved raw in the span; they are decoded when the
    /// argument text is extracted (see [`unquote`]).
    fn scan_double_quoted(&mut self, start: usize, loc: Location) -> Result<Token, Error> {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None => return Err(self.error(loc, "unterminated string")),
                Some(b'\\') => {
                    // escape: the next byte never closes the string
                    self.advance();
                    if self.advance().is_none() {
                        return Err(self.error(loc, "unterminated string"));
                    }
                }
                Some(b'"') => {
                    self.advance();
                    return Ok(self.token(TokenKind::DoubleQuoted, start, loc));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a single-quoted string literal (no escapes).
    fn scan_single_quoted(&mut self, start: usize, loc: Location) -> Result<Token, Error> {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None => return Err(self.error(loc, "unterminated string")),
                Some(b'\'') => {
                    self.advance();
                    return Ok(self.token(TokenKind::SingleQuoted, start, loc));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan an unquoted word.
    ///
    /// A word runs until whitespace, punctuation (`;`, `{`, `}`), a quote,
    /// or a comment start. `:` and `+` stay inside the word so that
    /// unquoted arguments like `urn:ietf:params` survive intact; a word
    /// that is exactly `+` is the concatenation operator.
    fn scan_word(&mut self, start: usize, loc: Location) -> Token {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' | b';' | b'{' | b'}' | b'"' | b'\'' => break,
                b'/' if matches!(self.peek_at(1), Some(b'/' | b'*')) => break,
                _ => {
                    self.advance();
                }
            }
        }
        if &self.source[start..self.pos] == b"+" {
            return self.token(TokenKind::Plus, start, loc);
        }
        self.token(TokenKind::Word, start, loc)
    }
}

/// Extract the text of a string-valued token.
///
/// Strips the surrounding quotes and, for double-quoted strings, decodes
/// the `\n`, `\t`, `\"` and `\\` escape sequences. Unrecognized escapes
/// are kept literally, backslash included.
#[must_use]
pub fn unquote(raw: &str, kind: TokenKind) -> String {
    match kind {
        TokenKind::DoubleQuoted => {
            let inner = &raw[1..raw.len() - 1];
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c != '\\' {
                    out.push(c);
                    continue;
                }
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                }
            }
            out
        }
        TokenKind::SingleQuoted => raw[1..raw.len() - 1].to_string(),
        _ => raw.to_string(),
    }
}
