use bumpalo::Bump;

use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::parsed_expr::{Expr, Member, ParsedExpr};
use crate::parser::syntax::{AnnotatedSource, BinaryOp, Span, UnaryOp};
use crate::syntax::string_literal::unescape_string;

/// Default maximum nesting depth for expressions. Each level costs several
/// parser frames, so this stays well inside a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Parse a JSONX expression.
pub fn parse<'a, S>(arena: &'a Bump, source: &'a S) -> Result<ParsedExpr<'a>>
where
    S: AsRef<[u8]> + ?Sized,
{
    parse_with_max_depth(arena, source, DEFAULT_MAX_DEPTH)
}

/// Parse a JSONX expression, failing with [`ParseErrorKind::MaxDepthExceeded`]
/// once expressions nest deeper than `max_depth`.
pub fn parse_with_max_depth<'a, S>(
    arena: &'a Bump,
    source: &'a S,
    max_depth: usize,
) -> Result<ParsedExpr<'a>>
where
    S: AsRef<[u8]> + ?Sized,
{
    let lexed = Lexer::new(source.as_ref()).tokenize()?;
    let ann: &'a AnnotatedSource<'a, Expr<'a>> =
        arena.alloc(AnnotatedSource::new(arena, lexed.source));

    let mut parser = Parser {
        arena,
        source: lexed.source,
        tokens: lexed.tokens,
        pos: 0,
        depth: 0,
        max_depth,
        ann,
    };

    let expr = parser.expression(0)?;
    if parser.peek().kind != TokenKind::Eof {
        return Err(parser.unexpected("end of input"));
    }
    tracing::debug!(tokens = parser.tokens.len(), "parsed expression");
    Ok(ParsedExpr { expr, ann })
}

struct Parser<'a> {
    arena: &'a Bump,
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

type Result<T> = core::result::Result<T, ParseError>;

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof and the cursor never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        &self.tokens[(self.pos + ahead).min(self.tokens.len() - 1)]
    }

    fn text(&self, token: &Token) -> &'a str {
        token.span.str_of(self.source)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn is_punct(&self, symbol: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Punct && self.text(token) == symbol
    }

    fn eat_punct(&mut self, symbol: &str) -> Option<Span> {
        if self.is_punct(symbol) {
            Some(self.bump().span)
        } else {
            None
        }
    }

    fn expect_punct(&mut self, symbol: &str) -> Result<Span> {
        self.eat_punct(symbol)
            .ok_or_else(|| self.unexpected(&format!("'{}'", symbol)))
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source.to_string(), span)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text(token)),
        };
        self.error(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found,
            },
            token.span.clone(),
        )
    }

    fn alloc(&self, expr: Expr<'a>, span: Span) -> &'a Expr<'a> {
        let expr = self.arena.alloc(expr);
        self.ann.add_span(expr, span);
        expr
    }

    fn span_of(&self, expr: &Expr<'a>) -> Span {
        self.ann.span_of(expr).unwrap_or_default()
    }

    /// Enter one nesting level: a bracket, a parenthesis, call arguments or
    /// a unary operand. Pair with [`Parser::ascend`].
    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let span = self.peek().span.clone();
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth: self.depth,
                    max_depth: self.max_depth,
                },
                span,
            ));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let token = self.peek();
        if token.kind != TokenKind::Punct {
            return None;
        }
        BinaryOp::from_symbol(self.text(token))
    }

    /// Precedence climbing: parses operators binding at least as tightly as
    /// `min_prec`.
    fn expression(&mut self, min_prec: u8) -> Result<&'a Expr<'a>> {
        let mut left = self.unary()?;
        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();
            let right = self.expression(prec + 1)?;
            let span = Span::combine(&self.span_of(left), &self.span_of(right));
            left = self.alloc(Expr::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<&'a Expr<'a>> {
        let op = if self.is_punct("-") {
            UnaryOp::Neg
        } else if self.is_punct("!") {
            UnaryOp::Not
        } else {
            return self.postfix();
        };

        let start = self.bump().span;
        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        let span = Span::combine(&start, &self.span_of(operand));
        Ok(self.alloc(Expr::Unary { op, operand }, span))
    }

    fn postfix(&mut self) -> Result<&'a Expr<'a>> {
        let mut expr = self.primary()?;
        while self.is_punct("(")
            && matches!(
                expr,
                Expr::Identifier(_)
                    | Expr::RelativeRef { .. }
                    | Expr::Call { .. }
                    | Expr::Lambda { .. }
            )
        {
            self.bump();
            self.descend()?;
            let args = self.delimited(")", |p| p.expression(0))?;
            let end = self.expect_punct(")")?;
            self.ascend();
            let span = Span::combine(&self.span_of(expr), &end);
            expr = self.alloc(
                Expr::Call {
                    callee: expr,
                    args: self.arena.alloc_slice_copy(&args),
                },
                span,
            );
        }
        Ok(expr)
    }

    /// Comma-separated items up to (not including) `close`, with an optional
    /// trailing comma.
    fn delimited<T>(
        &mut self,
        close: &str,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while !self.is_punct(close) {
            items.push(item(self)?);
            if self.eat_punct(",").is_none() {
                break;
            }
        }
        Ok(items)
    }

    fn primary(&mut self) -> Result<&'a Expr<'a>> {
        let token = self.peek().clone();
        let text = self.text(&token);

        let expr = match token.kind {
            TokenKind::Number => Expr::Number(text),
            TokenKind::String | TokenKind::Template => Expr::String(self.string_contents(&token)?),
            TokenKind::Blob16 => Expr::Blob16(&text[4..text.len() - 1]),
            TokenKind::Blob64 => Expr::Blob64(&text[4..text.len() - 1]),
            TokenKind::Identifier => match text {
                "true" => Expr::Boolean(true),
                "false" => Expr::Boolean(false),
                "null" => Expr::Null,
                name => Expr::Identifier(name),
            },
            TokenKind::Dots => return self.relative_ref(),
            TokenKind::Punct if matches!(text, "(" | "[" | "{") => {
                self.descend()?;
                let expr = match text {
                    "(" => self.paren_or_lambda()?,
                    "[" => self.array()?,
                    _ => self.object()?,
                };
                self.ascend();
                return Ok(expr);
            }
            TokenKind::Punct => return Err(self.unexpected("expression")),
            TokenKind::Eof => return Err(self.unexpected("expression")),
        };

        self.bump();
        Ok(self.alloc(expr, token.span))
    }

    fn string_contents(&self, token: &Token) -> Result<&'a str> {
        let text = self.text(token);
        let inner = &text[1..text.len() - 1];
        unescape_string(self.arena, inner)
            .map_err(|e| self.error(ParseErrorKind::InvalidString(e), token.span.clone()))
    }

    fn relative_ref(&mut self) -> Result<&'a Expr<'a>> {
        let dots = self.bump();
        let level = dots.span.0.len() - 1;
        let token = self.peek().clone();
        if token.kind != TokenKind::Identifier {
            return Err(self.unexpected("identifier after '.'"));
        }
        self.bump();
        let name = self.text(&token);
        Ok(self.alloc(
            Expr::RelativeRef { level, name },
            Span::combine(&dots.span, &token.span),
        ))
    }

    /// `(` starts either a lambda parameter list or a grouping. The lambda
    /// reading is tried first; on failure the cursor is rewound.
    fn paren_or_lambda(&mut self) -> Result<&'a Expr<'a>> {
        let start = self.peek().span.clone();
        let mark = self.pos;

        if let Some(params) = self.lambda_params() {
            let body = self.expression(0)?;
            let span = Span::combine(&start, &self.span_of(body));
            return Ok(self.alloc(
                Expr::Lambda {
                    params: self.arena.alloc_slice_copy(&params),
                    body,
                },
                span,
            ));
        }

        self.pos = mark;
        self.bump();
        let inner = self.expression(0)?;
        self.expect_punct(")")?;
        Ok(inner)
    }

    /// Consumes `( ident, ... ) =>` and returns the parameter names, or
    /// `None` (cursor left anywhere) when the tokens do not form one.
    fn lambda_params(&mut self) -> Option<Vec<&'a str>> {
        self.bump();
        let mut params = Vec::new();
        loop {
            if self.eat_punct(")").is_some() {
                break;
            }
            let token = self.peek().clone();
            if token.kind != TokenKind::Identifier {
                return None;
            }
            self.bump();
            params.push(self.text(&token));
            if self.eat_punct(",").is_none() {
                self.eat_punct(")")?;
                break;
            }
        }
        self.eat_punct("=>")?;
        Some(params)
    }

    fn array(&mut self) -> Result<&'a Expr<'a>> {
        let start = self.bump().span;
        let elements = self.delimited("]", |p| p.expression(0))?;
        let end = self.expect_punct("]")?;
        Ok(self.alloc(
            Expr::Array(self.arena.alloc_slice_copy(&elements)),
            Span::combine(&start, &end),
        ))
    }

    fn object(&mut self) -> Result<&'a Expr<'a>> {
        let start = self.bump().span;
        let members = self.delimited("}", |p| p.member())?;
        let end = self.expect_punct("}")?;
        Ok(self.alloc(
            Expr::Object(self.arena.alloc_slice_copy(&members)),
            Span::combine(&start, &end),
        ))
    }

    fn member(&mut self) -> Result<Member<'a>> {
        let token = self.peek().clone();
        let key = match token.kind {
            TokenKind::Identifier => {
                let next = self.peek_at(1);
                if next.kind == TokenKind::Punct && self.text(next) == "(" {
                    return Ok(Member::Spread(self.postfix()?));
                }
                self.text(&token)
            }
            TokenKind::String | TokenKind::Template => self.string_contents(&token)?,
            _ => return Err(self.unexpected("property name")),
        };
        self.bump();
        self.expect_punct(":")?;
        let value = self.expression(0)?;
        Ok(Member::Property { key, value })
    }
}
