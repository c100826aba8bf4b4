//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Engine errors**: unknown or duplicate binding names and dependency
//!   cycles between bindings.
//!
//! - **Resource exceeded errors**: the step quota, the space quota or the
//!   call depth limit ran out. Quotas are never replenished, so once these
//!   fire every further forcing in the same engine fails too.
//!
//! - **Runtime errors**: the evaluated expression is ill-formed for its
//!   operands (type mismatch, division by zero, unknown name, ...).
//!
//! - **Include errors**: storage failures and parse errors of included
//!   documents.

use core::fmt;

use crate::api::StorageError;
use crate::parser::{ParseError, Span};

#[derive(Debug)]
pub enum EvalError {
    /// No binding with this name was ever defined.
    UnknownBinding { name: String },

    /// The binding was requested while it was already being forced.
    Cycle { name: String },

    /// A binding with this name already exists.
    DuplicateBinding { name: String },

    ResourceExceeded(ResourceExceeded),

    Runtime(RuntimeError),

    /// Reading an included document failed.
    Storage(StorageError),

    /// An included document failed to parse.
    Include { path: String, error: Box<ParseError> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceExceeded {
    /// No evaluation steps left.
    TimeLimit { max_steps: u64 },

    /// The result is larger than the space left. Nothing was charged.
    SpaceLimit { needed: u64, remaining: u64 },

    /// Lambda calls nested too deeply.
    StackOverflow { depth: usize, max_depth: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UnknownName {
        name: String,
        span: Option<Span>,
    },

    /// A relative reference climbed above the document root.
    ScopeOutOfRange {
        level: usize,
        name: String,
        span: Option<Span>,
    },

    TypeMismatch {
        message: String,
        span: Option<Span>,
    },

    DivisionByZero {
        span: Option<Span>,
    },

    /// BigInt arithmetic left the representable range.
    Overflow {
        span: Option<Span>,
    },

    InvalidNumber {
        text: String,
        span: Option<Span>,
    },

    InvalidBlob {
        message: String,
        span: Option<Span>,
    },

    NotCallable {
        type_name: &'static str,
        span: Option<Span>,
    },

    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Option<Span>,
    },
}

impl RuntimeError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            RuntimeError::UnknownName { span, .. }
            | RuntimeError::ScopeOutOfRange { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::Overflow { span }
            | RuntimeError::InvalidNumber { span, .. }
            | RuntimeError::InvalidBlob { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::ArityMismatch { span, .. } => span.as_ref(),
        }
    }

    /// Attach `span` unless the error already carries a location.
    pub fn at(mut self, at: &Span) -> Self {
        let slot = match &mut self {
            RuntimeError::UnknownName { span, .. }
            | RuntimeError::ScopeOutOfRange { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::Overflow { span }
            | RuntimeError::InvalidNumber { span, .. }
            | RuntimeError::InvalidBlob { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::ArityMismatch { span, .. } => span,
        };
        if slot.is_none() {
            *slot = Some(at.clone());
        }
        self
    }
}

impl EvalError {
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, EvalError::ResourceExceeded(_))
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnknownBinding { name } => write!(f, "Unknown binding '{}'", name),
            EvalError::Cycle { name } => {
                write!(f, "Cyclic dependency while evaluating '{}'", name)
            }
            EvalError::DuplicateBinding { name } => {
                write!(f, "Binding '{}' is already defined", name)
            }
            EvalError::ResourceExceeded(e) => write!(f, "{}", e),
            EvalError::Runtime(e) => write!(f, "{}", e),
            EvalError::Storage(e) => write!(f, "{}", e),
            EvalError::Include { path, error } => {
                write!(f, "Failed to parse included '{}': {}", path, error.kind)
            }
        }
    }
}

fn write_span(f: &mut fmt::Formatter<'_>, span: &Option<Span>) -> fmt::Result {
    if let Some(span) = span {
        write!(f, " at {}..{}", span.0.start, span.0.end)?;
    }
    Ok(())
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownName { name, span } => {
                write!(f, "Unknown name '{}'", name)?;
                write_span(f, span)
            }
            RuntimeError::ScopeOutOfRange { level, name, span } => {
                write!(
                    f,
                    "Reference '{}{}' climbs above the document root",
                    ".".repeat(level + 1),
                    name
                )?;
                write_span(f, span)
            }
            RuntimeError::TypeMismatch { message, span } => {
                write!(f, "Type mismatch: {}", message)?;
                write_span(f, span)
            }
            RuntimeError::DivisionByZero { span } => {
                write!(f, "Division by zero")?;
                write_span(f, span)
            }
            RuntimeError::Overflow { span } => {
                write!(f, "BigInt overflow")?;
                write_span(f, span)
            }
            RuntimeError::InvalidNumber { text, span } => {
                write!(f, "Invalid number literal '{}'", text)?;
                write_span(f, span)
            }
            RuntimeError::InvalidBlob { message, span } => {
                write!(f, "Invalid blob literal: {}", message)?;
                write_span(f, span)
            }
            RuntimeError::NotCallable { type_name, span } => {
                write!(f, "Value of type {} is not callable", type_name)?;
                write_span(f, span)
            }
            RuntimeError::ArityMismatch {
                name,
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Function {} expects {} argument(s), got {}",
                    name, expected, got
                )?;
                write_span(f, span)
            }
        }
    }
}

impl fmt::Display for ResourceExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceExceeded::TimeLimit { max_steps } => {
                write!(f, "Time limit exceeded: all {} evaluation steps used", max_steps)
            }
            ResourceExceeded::SpaceLimit { needed, remaining } => write!(
                f,
                "Space limit exceeded: result needs {} units, {} remaining",
                needed, remaining
            ),
            ResourceExceeded::StackOverflow { depth, max_depth } => write!(
                f,
                "Evaluation stack overflow: depth {} exceeds maximum of {}",
                depth, max_depth
            ),
        }
    }
}

impl From<RuntimeError> for EvalError {
    fn from(e: RuntimeError) -> Self {
        EvalError::Runtime(e)
    }
}

impl From<ResourceExceeded> for EvalError {
    fn from(e: ResourceExceeded) -> Self {
        EvalError::ResourceExceeded(e)
    }
}

impl From<StorageError> for EvalError {
    fn from(e: StorageError) -> Self {
        EvalError::Storage(e)
    }
}

impl std::error::Error for EvalError {}

impl std::error::Error for RuntimeError {}

impl std::error::Error for ResourceExceeded {}
