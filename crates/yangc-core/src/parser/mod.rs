//! Statement parser module.
//!
//! Parses a token stream into a generic [`Statement`] tree:
//!
//! ```text
//! statement := keyword [argument] (';' | '{' statement* '}')
//! argument  := part ('+' part)*
//! ```
//!
//! The parser is keyword-agnostic: any word can open a statement, and
//! arguments are collapsed into a single string here (YANG string
//! concatenation). Semantic checks happen later, in the node resolver.

use crate::ast::Statement;
use crate::error::Error;
use crate::lexer::{unquote, Lexer, Location, Span, Token, TokenKind};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Statement parser.
pub struct Parser<'src> {
    /// Source text (for extracting token content).
    source: &'src str,
    /// Logical source name for diagnostics.
    source_name: &'src str,
    /// Tokens from the lexer.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source text.
    ///
    /// Tokenizes up front; lex failures surface here.
    pub fn new(source: &'src str, source_name: &'src str) -> Result<Self, Error> {
        let tokens = Lexer::new(source, source_name).tokenize()?;
        Ok(Self {
            source,
            source_name,
            tokens,
            pos: 0,
        })
    }

    /// Parse exactly one root statement.
    ///
    /// Fails if the input is empty or if tokens remain after the root
    /// statement closes.
    pub fn parse(mut self) -> Result<Statement, Error> {
        let root = self.parse_statement()?;
        if !self.is_eof() {
            return Err(self.error("trailing tokens after root statement"));
        }
        Ok(root)
    }

    // === Token access methods ===

    /// Check if we're at EOF.
    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Peek at the current token.
    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    /// Get the EOF token for this source.
    fn eof_token(&self) -> Token {
        let end = self.source.len() as u32;
        // past-the-end location is only approximate; good enough for EOF
        Token::new(TokenKind::Eof, Span::new(end, end), Location::START)
    }

    /// Advance and return the current token.
    fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Extract raw text for a span.
    fn text(&self, span: Span) -> &str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// Extract the decoded string value of a token.
    fn string_value(&self, token: Token) -> String {
        unquote(self.text(token.span), token.kind)
    }

    /// Create a syntax error at the current token.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.peek().loc, message)
    }

    /// Create a syntax error at a specific location.
    fn error_at(&self, loc: Location, message: &str) -> Error {
        Error::Syntax {
            source_name: self.source_name.to_string(),
            loc,
            message: message.to_string(),
        }
    }

    // === Parsing methods ===

    /// Parse one statement, including its block of children if present.
    fn parse_statement(&mut self) -> Result<Statement, Error> {
        let keyword_token = self.peek();
        if keyword_token.kind != TokenKind::Word {
            return Err(self.error(&format!(
                "expected statement keyword, found {:?}",
                keyword_token.kind
            )));
        }
        self.advance();

        let (prefix, keyword) = split_keyword(self.text(keyword_token.span))
            .ok_or_else(|| self.error_at(keyword_token.loc, "malformed prefixed keyword"))?;

        let argument = self.parse_argument()?;

        let mut stmt = Statement::new(keyword, prefix, argument, keyword_token.loc);

        match self.peek().kind {
            TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::LBrace => {
                let open = self.advance();
                while !self.check(TokenKind::RBrace) {
                    if self.is_eof() {
                        return Err(self.error_at(open.loc, "unmatched '{'"));
                    }
                    stmt.children.push(self.parse_statement()?);
                }
                self.advance(); // consume '}'
            }
            _ => {
                return Err(self.error(&format!(
                    "expected ';' or '{{' after '{}'",
                    stmt.full_keyword()
                )));
            }
        }

        Ok(stmt)
    }

    /// Parse an optional argument: `part ('+' part)*`.
    ///
    /// Adjacent parts joined by `+` are collapsed into a single string.
    fn parse_argument(&mut self) -> Result<Option<String>, Error> {
        if !self.peek().kind.is_string() {
            return Ok(None);
        }
        let first = self.advance();
        let mut value = self.string_value(first);
        while self.check(TokenKind::Plus) {
            let plus = self.advance();
            let part = self.peek();
            if !part.kind.is_string() {
                return Err(self.error_at(plus.loc, "expected string after '+'"));
            }
            self.advance();
            value.push_str(&self.string_value(part));
        }
        Ok(Some(value))
    }
}

/// Split a keyword token at the first `:` into `(prefix, identifier)`.
///
/// Returns `None` when either side of the colon is empty.
fn split_keyword(text: &str) -> Option<(Option<String>, String)> {
    match text.split_once(':') {
        Some((prefix, keyword)) => {
            if prefix.is_empty() || keyword.is_empty() {
                None
            } else {
                Some((Some(prefix.to_string()), keyword.to_string()))
            }
        }
        None => Some((None, text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to parse one source text.
    fn parse(source: &str) -> Result<Statement, Error> {
        Parser::new(source, "test")?.parse()
    }

    #[test]
    fn test_empty_statement() {
        let stmt = parse("module foo { }").expect("parse failure");
        assert_eq!(stmt.keyword, "module");
        assert_eq!(stmt.arg(), Some("foo"));
        assert!(stmt.children.is_empty());
    }

    #[test]
    fn test_terminated_statement() {
        let stmt = parse("prefix f;").expect("parse failure");
        assert_eq!(stmt.keyword, "prefix");
        assert_eq!(stmt.arg(), Some("f"));
    }

    #[test]
    fn test_no_argument() {
        let stmt = parse("input { leaf x { type string; } }").expect("parse failure");
        assert_eq!(stmt.keyword, "input");
        assert_eq!(stmt.arg(), None);
        assert_eq!(stmt.children.len(), 1);
    }

    #[test]
    fn test_nested_children_in_order() {
        let stmt = parse(
            r#"module test {
                prefix "t";
                namespace "urn:t";
                import foo { prefix "f"; }
            }"#,
        )
        .expect("parse failure");

        let keywords: Vec<_> = stmt.children.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["prefix", "namespace", "import"]);
        assert_eq!(stmt.children[2].children[0].arg(), Some("f"));
    }

    #[test]
    fn test_prefixed_keyword() {
        let stmt = parse("md:annotation note;").expect("parse failure");
        assert_eq!(stmt.prefix.as_deref(), Some("md"));
        assert_eq!(stmt.keyword, "annotation");
        assert_eq!(stmt.full_keyword(), "md:annotation");
    }

    #[test]
    fn test_malformed_prefixed_keyword() {
        let err = parse("md: oops;");
        assert!(matches!(err, Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_string_concatenation() {
        let stmt = parse(r#"pattern "[a-z]" + "[0-9]*";"#).expect("parse failure");
        assert_eq!(stmt.arg(), Some("[a-z][0-9]*"));
    }

    #[test]
    fn test_concatenation_mixed_quotes() {
        let stmt = parse(r#"description "a" + 'b' + "c";"#).expect("parse failure");
        assert_eq!(stmt.arg(), Some("abc"));
    }

    #[test]
    fn test_dangling_plus() {
        let err = parse(r#"description "a" + ;"#);
        match err {
            Err(Error::Syntax { message, .. }) => {
                assert!(message.contains("expected string after '+'"));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_open_brace() {
        let err = parse("module foo { prefix f;");
        match err {
            Err(Error::Syntax { loc, message, .. }) => {
                assert!(message.contains("unmatched"));
                assert_eq!(loc, Location::new(1, 12));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("module foo { } module bar { }");
        match err {
            Err(Error::Syntax { message, .. }) => {
                assert!(message.contains("trailing"));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_terminator() {
        let err = parse("module foo");
        assert!(matches!(err, Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_escapes_decoded_in_argument() {
        let stmt = parse(r#"description "line one\nline two";"#).expect("parse failure");
        assert_eq!(stmt.arg(), Some("line one\nline two"));
    }

    #[test]
    fn test_statement_location() {
        let stmt = parse("module foo {\n  prefix f;\n}").expect("parse failure");
        assert_eq!(stmt.loc, Location::new(1, 1));
        assert_eq!(stmt.children[0].loc, Location::new(2, 3));
    }
}
