//! Error types for lexing, parsing, and resolution.

use crate::lexer::Location;
use alloc::format;
use alloc::string::String;
use thiserror::Error;

/// Errors produced by the front-end.
///
/// Every variant names the logical source or module involved; positional
/// variants carry the 1-based line/column of the offending token or
/// statement. Each layer returns the first error it encounters to its
/// caller; there is no local retry or recovery.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Tokenization failure (unterminated string or block comment).
    #[error("{source_name}:{loc}: lex error: {message}")]
    Lex {
        /// Logical source name.
        source_name: String,
        /// Location of the offending text.
        loc: Location,
        /// What went wrong.
        message: String,
    },

    /// Statement-grammar failure (unbalanced braces, trailing tokens,
    /// argument shape violations).
    #[error("{source_name}:{loc}: syntax error: {message}")]
    Syntax {
        /// Logical source name.
        source_name: String,
        /// Location of the offending token.
        loc: Location,
        /// What went wrong.
        message: String,
    },

    /// Cardinality or unknown-keyword failure during node resolution.
    #[error("{source_name}:{loc}: cannot resolve {keyword}{}: {message}", display_argument(.argument))]
    Resolution {
        /// Logical source name.
        source_name: String,
        /// Keyword of the offending statement, prefix included.
        keyword: String,
        /// Argument of the offending statement, if any.
        argument: Option<String>,
        /// Location of the offending statement.
        loc: Location,
        /// What went wrong.
        message: String,
    },

    /// A name or prefix lookup missed.
    #[error("{name}: no such {entity}")]
    NotFound {
        /// What was looked up ("module" or "prefix").
        entity: &'static str,
        /// The name that missed.
        name: String,
    },

    /// An import or include target could not be resolved.
    #[error("module {module}: cannot resolve {target}: {message}")]
    Import {
        /// The requesting module.
        module: String,
        /// The import/include target.
        target: String,
        /// What went wrong.
        message: String,
    },
}

/// Format an optional statement argument for display.
fn display_argument(argument: &Option<String>) -> String {
    match argument {
        Some(argument) => format!(" \"{argument}\""),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_carries_name_and_location() {
        let err = Error::Syntax {
            source_name: "test".into(),
            loc: Location::new(3, 7),
            message: "unmatched '{'".into(),
        };
        assert_eq!(err.to_string(), "test:3:7: syntax error: unmatched '{'");
    }

    #[test]
    fn test_resolution_display_with_argument() {
        let err = Error::Resolution {
            source_name: "mod".into(),
            keyword: "namespace".into(),
            argument: Some("urn:t".into()),
            loc: Location::new(4, 5),
            message: "duplicate statement".into(),
        };
        assert_eq!(
            err.to_string(),
            "mod:4:5: cannot resolve namespace \"urn:t\": duplicate statement"
        );
    }

    #[test]
    fn test_resolution_display_without_argument() {
        let err = Error::Resolution {
            source_name: "mod".into(),
            keyword: "import".into(),
            argument: None,
            loc: Location::START,
            message: "missing argument".into(),
        };
        assert_eq!(
            err.to_string(),
            "mod:1:1: cannot resolve import: missing argument"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            entity: "prefix",
            name: "xx".into(),
        };
        assert_eq!(err.to_string(), "xx: no such prefix");
    }
}
