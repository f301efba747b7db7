//! Token types, spans, and source locations.

use super::ByteOffset;

/// Span of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: ByteOffset,
    /// End byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: ByteOffset, end: ByteOffset) -> Self {
        Self { start, end }
    }

    /// Get the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> ByteOffset {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 1-based line/column position in source text.
///
/// Columns count bytes from the start of the line, which matches how
/// diagnostics are conventionally reported for YANG sources (ASCII-heavy
/// module text).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl Location {
    /// Create a new location.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The start of a source text.
    pub const START: Self = Self { line: 1, column: 1 };
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with kind, source span, and location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte range in source text.
    pub span: Span,
    /// Line/column of the token start.
    pub loc: Location,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, loc: Location) -> Self {
        Self { kind, span, loc }
    }
}

/// Token kinds.
///
/// YANG statements are built from strings and three pieces of punctuation;
/// everything else (comments, whitespace) is stripped by the lexer. A bare
/// word may contain `:` (prefixed keywords, URN arguments); splitting a
/// prefixed keyword is the statement parser's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// End of input.
    Eof = 0,

    /// Unquoted string (keywords and bare arguments).
    Word,
    /// Double-quoted string (backslash escapes apply).
    DoubleQuoted,
    /// Single-quoted string (contents taken literally).
    SingleQuoted,

    /// `+` standing alone (string concatenation).
    Plus,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
}

impl TokenKind {
    /// Check if this token can contribute text to a statement argument.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::Word | Self::DoubleQuoted | Self::SingleQuoted)
    }
}
