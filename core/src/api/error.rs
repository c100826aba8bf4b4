//! Public error types for the JSONX API.
//!
//! This module defines the stable error types exposed to library users.
//! Internal errors are converted to these public types at API boundaries.

use std::fmt;

use crate::evaluator::EvalError;
use crate::parser::{ParseError, Span};

use super::host::StorageError;

/// Public error type for all JSONX operations.
#[derive(Debug)]
pub enum Error {
    /// Invalid API usage (unknown binding, name clash).
    Api(String),

    /// Parse errors, in the loaded document or an included one.
    ///
    /// `source` is the text the diagnostics' spans point into.
    Compilation {
        diagnostics: Vec<Diagnostic>,
        source: String,
    },

    /// Errors raised while evaluating (type mismatch, cycle, ...).
    Runtime(String),

    /// Step, space or call depth limits exceeded.
    ResourceExceeded(String),

    /// A document could not be read.
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api(msg) => write!(f, "API error: {}", msg),
            Error::Compilation { diagnostics, .. } => {
                let error_count = diagnostics
                    .iter()
                    .filter(|d| d.severity == Severity::Error)
                    .count();
                write!(f, "Compilation failed with {} error(s)", error_count)
            }
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Error::ResourceExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Suggestions on how to fix the issue.
    pub help: Vec<String>,

    /// Optional error code (e.g., "P001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics. Every diagnostic produced today is an
/// error; parsing stops at the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Related information for a diagnostic (e.g., "included here").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            source: err.source,
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::UnknownBinding { .. } | EvalError::DuplicateBinding { .. } => {
                Error::Api(err.to_string())
            }
            EvalError::Cycle { .. } | EvalError::Runtime(_) => Error::Runtime(err.to_string()),
            EvalError::ResourceExceeded(e) => Error::ResourceExceeded(e.to_string()),
            EvalError::Storage(e) => Error::from(e),
            EvalError::Include { path, error } => {
                let mut diagnostic = error.to_diagnostic();
                diagnostic.message = format!("in '{}': {}", path, diagnostic.message);
                Error::Compilation {
                    diagnostics: vec![diagnostic],
                    source: error.source,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{ResourceExceeded, RuntimeError};
    use crate::parser::ParseErrorKind;

    #[test]
    fn test_parse_error_becomes_compilation() {
        let err = ParseError::new(
            ParseErrorKind::UnterminatedComment,
            "1 /*".to_string(),
            Span(2..4),
        );
        match Error::from(err) {
            Error::Compilation {
                diagnostics,
                source,
            } => {
                assert_eq!(source, "1 /*");
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].span, Span(2..4));
                assert_eq!(diagnostics[0].code.as_deref(), Some("L003"));
                assert_eq!(diagnostics[0].severity.to_string(), "error");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_eval_error_categories() {
        assert!(matches!(
            Error::from(EvalError::UnknownBinding {
                name: "x".to_string()
            }),
            Error::Api(_)
        ));
        assert!(matches!(
            Error::from(EvalError::Cycle {
                name: "x".to_string()
            }),
            Error::Runtime(_)
        ));
        assert!(matches!(
            Error::from(EvalError::from(RuntimeError::DivisionByZero { span: None })),
            Error::Runtime(msg) if msg == "Division by zero"
        ));
        assert!(matches!(
            Error::from(EvalError::from(ResourceExceeded::TimeLimit { max_steps: 3 })),
            Error::ResourceExceeded(_)
        ));
        assert!(matches!(
            Error::from(EvalError::from(StorageError::NotFound {
                path: "a".to_string()
            })),
            Error::Storage(msg) if msg == "'a' not found"
        ));
    }

    #[test]
    fn test_include_error_keeps_included_source() {
        let err = EvalError::Include {
            path: "b.jx".to_string(),
            error: Box::new(ParseError::new(
                ParseErrorKind::UnexpectedCharacter { found: '#' },
                "{ # }".to_string(),
                Span(2..3),
            )),
        };
        match Error::from(err) {
            Error::Compilation {
                diagnostics,
                source,
            } => {
                assert_eq!(source, "{ # }");
                assert!(diagnostics[0].message.starts_with("in 'b.jx': "));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = Error::ResourceExceeded("too much".to_string());
        assert_eq!(err.to_string(), "Resource limit exceeded: too much");
    }
}
