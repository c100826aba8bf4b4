use crate::parser::{BinaryOp, UnaryOp, syntax::AnnotatedSource};
use serde::Serialize;

#[derive(Debug)]
pub struct ParsedExpr<'a> {
    pub expr: &'a Expr<'a>,
    pub ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// Raw literal text, e.g. `1.5e3` or `42n`. Interpreted downstream.
    Number(&'a str),
    /// Decoded string contents.
    String(&'a str),
    Boolean(bool),
    Null,
    /// Hex text between `b16'` and `'`, not yet decoded.
    Blob16(&'a str),
    /// Base64 text between `b64'` and `'`, not yet decoded.
    Blob64(&'a str),
    Identifier(&'a str),
    /// `.name` is `level: 0` (current scope); each extra dot ascends one scope.
    RelativeRef {
        level: usize,
        name: &'a str,
    },
    Array(&'a [&'a Expr<'a>]),
    Object(&'a [Member<'a>]),
    Call {
        callee: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
    },
    Lambda {
        params: &'a [&'a str],
        body: &'a Expr<'a>,
    },
    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Expr<'a>,
    },
}

impl<'a> Expr<'a> {
    pub fn as_ptr(&self) -> *const Self {
        self as *const _
    }

    /// Name of the called function when this is a call of a plain identifier.
    pub fn callee_name(&self) -> Option<&'a str> {
        if let Expr::Call { callee, .. } = self {
            if let Expr::Identifier(name) = **callee {
                return Some(name);
            }
        }
        None
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    Property { key: &'a str, value: &'a Expr<'a> },
    /// An `include(...)`-style call whose result is spliced into the object.
    Spread(&'a Expr<'a>),
}
