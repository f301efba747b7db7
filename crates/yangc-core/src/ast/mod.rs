//! Generic statement tree.
//!
//! A [`Statement`] is the keyword-agnostic syntactic unit of YANG source:
//! a keyword (optionally prefixed), an optional argument string, and an
//! optional block of child statements. No semantic validation happens at
//! this level; child order is preserved exactly as written.

use crate::lexer::Location;
use alloc::string::String;
use alloc::vec::Vec;

/// One parsed YANG statement.
///
/// The argument has already been de-concatenated: adjacent quoted segments
/// joined with `+` arrive here as a single string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// The statement keyword (without prefix).
    pub keyword: String,
    /// The keyword prefix, for extension statements written `prefix:keyword`.
    pub prefix: Option<String>,
    /// The argument string, absent when the statement has none.
    pub argument: Option<String>,
    /// Child statements in source order.
    pub children: Vec<Statement>,
    /// Source location of the keyword.
    pub loc: Location,
}

impl Statement {
    /// Create a new statement with no children.
    #[must_use]
    pub fn new(
        keyword: String,
        prefix: Option<String>,
        argument: Option<String>,
        loc: Location,
    ) -> Self {
        Self {
            keyword,
            prefix,
            argument,
            children: Vec::new(),
            loc,
        }
    }

    /// The keyword as written in source, prefix included.
    #[must_use]
    pub fn full_keyword(&self) -> String {
        match &self.prefix {
            Some(prefix) => alloc::format!("{prefix}:{}", self.keyword),
            None => self.keyword.clone(),
        }
    }

    /// The argument string, if any.
    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// First child with the given (unprefixed) keyword.
    #[must_use]
    pub fn child(&self, keyword: &str) -> Option<&Statement> {
        self.children
            .iter()
            .find(|c| c.prefix.is_none() && c.keyword == keyword)
    }

    /// All children with the given (unprefixed) keyword, in source order.
    pub fn children_named<'a>(
        &'a self,
        keyword: &'a str,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.children
            .iter()
            .filter(move |c| c.prefix.is_none() && c.keyword == keyword)
    }
}
