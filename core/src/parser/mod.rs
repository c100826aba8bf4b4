pub mod error;
pub mod lexer;
mod parsed_expr;
pub mod parser;
mod syntax;

pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Token, TokenKind, tokenize};
pub use parsed_expr::{Expr, Member, ParsedExpr};
pub use syntax::AnnotatedSource;
pub use syntax::{BinaryOp, Span, UnaryOp};


#[cfg(test)]
mod literals_test;

#[cfg(test)]
mod parse_test;
