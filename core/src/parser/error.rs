use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;
use crate::scanner::DecodeError;
use crate::syntax::string_literal::UnescapeError;

/// Parser error with context
#[derive(Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Malformed UTF-8 in the input
    #[error("{0}")]
    Decode(DecodeError),
    /// A character that cannot start any token
    #[error("Unexpected character '{found}'")]
    UnexpectedCharacter { found: char },
    /// String literal without its closing quote
    #[error("Unterminated string literal, expected closing {quote}")]
    UnterminatedString { quote: char },
    /// Block comment without `*/`
    #[error("Unterminated block comment")]
    UnterminatedComment,
    /// Malformed `b16'...'` or `b64'...'` literal
    #[error("Invalid blob literal: {message}")]
    InvalidBlob { message: String },
    /// Bad escape sequence inside a string literal
    #[error("Invalid string literal: {0}")]
    InvalidString(UnescapeError),
    /// Unexpected token
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    /// Maximum nesting depth exceeded
    #[error("Expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },
}

impl ParseErrorKind {
    /// Whether the error was raised while splitting the input into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            ParseErrorKind::UnexpectedCharacter { .. }
                | ParseErrorKind::UnterminatedString { .. }
                | ParseErrorKind::UnterminatedComment
                | ParseErrorKind::InvalidBlob { .. }
        )
    }

    fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::Decode(_) => "D001",
            ParseErrorKind::UnexpectedCharacter { .. } => "L001",
            ParseErrorKind::UnterminatedString { .. } => "L002",
            ParseErrorKind::UnterminatedComment => "L003",
            ParseErrorKind::InvalidBlob { .. } => "L004",
            ParseErrorKind::InvalidString(_) => "L005",
            ParseErrorKind::UnexpectedToken { .. } => "P001",
            ParseErrorKind::MaxDepthExceeded { .. } => "P004",
        }
    }

    fn help(&self) -> Vec<String> {
        match self {
            ParseErrorKind::Decode(_) => vec!["The input must be valid UTF-8".to_string()],
            ParseErrorKind::UnterminatedString { quote } => {
                vec![format!("Add the missing closing {}", quote)]
            }
            ParseErrorKind::UnterminatedComment => {
                vec!["Close the comment with */".to_string()]
            }
            ParseErrorKind::MaxDepthExceeded { .. } => {
                vec!["Reduce nesting or simplify the expression".to_string()]
            }
            _ => vec![],
        }
    }
}

impl From<DecodeError> for ParseErrorKind {
    fn from(err: DecodeError) -> Self {
        ParseErrorKind::Decode(err)
    }
}

impl ParseError {
    /// Create a new ParseError
    pub fn new(kind: ParseErrorKind, source: String, span: Span) -> Self {
        Self { kind, source, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: vec![],
            help: self.kind.help(),
            code: Some(self.kind.code().to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }
        write!(f, " at {}..{}", self.span.0.start, self.span.0.end)?;

        for help_msg in &diagnostic.help {
            write!(f, "\nhelp: {}", help_msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
