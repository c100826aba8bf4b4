//! Tokenizer for JSONX source text.
//!
//! Walks the input with a [`Utf8Scanner`], discarding whitespace and
//! comments, and produces a token list terminated by a single
//! [`TokenKind::Eof`]. Tokens only carry their kind and span; the lexeme is
//! the source text under the span.

use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::Span;
use crate::scanner::{DecodeError, Utf8Scanner};
use crate::syntax::blob_literal::{is_b16_char, is_b64_char};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    /// Single or double quoted string.
    String,
    /// Back-quoted string.
    Template,
    Blob16,
    Blob64,
    Identifier,
    /// A run of one or more `.`.
    Dots,
    Punct,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.str_of(source)
    }
}

/// The token list together with the validated source it points into.
#[derive(Debug)]
pub struct Tokens<'a> {
    pub source: &'a str,
    pub tokens: Vec<Token>,
}

// Longest first, so that `===` wins over `==` and `=>`.
const PUNCTUATION: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "=>", "&&", "||", "<", ">", "!", "+", "-", "*", "/",
    "%", "(", ")", "[", "]", "{", "}", ":", ",",
];

pub fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[derive(Debug)]
struct LexError {
    kind: ParseErrorKind,
    span: Span,
}

impl From<DecodeError> for LexError {
    fn from(err: DecodeError) -> Self {
        LexError {
            span: Span::at(err.offset()),
            kind: ParseErrorKind::Decode(err),
        }
    }
}

pub struct Lexer<'a> {
    bytes: &'a [u8],
    scanner: Utf8Scanner<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            scanner: Utf8Scanner::new(bytes),
        }
    }

    pub fn tokenize(mut self) -> Result<Tokens<'a>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token().map_err(|e| self.error(e))?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        // The scanner skips stray continuation bytes while looking for
        // boundaries; validating the whole input catches those.
        let source = core::str::from_utf8(self.bytes).map_err(|e| {
            let offset = e.valid_up_to();
            self.error(LexError::from(DecodeError::InvalidLeadByte {
                offset,
                byte: self.bytes[offset],
            }))
        })?;

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(Tokens { source, tokens })
    }

    fn error(&self, err: LexError) -> ParseError {
        ParseError::new(
            err.kind,
            String::from_utf8_lossy(self.bytes).into_owned(),
            err.span,
        )
    }

    fn current(&self) -> Result<Option<char>, LexError> {
        Ok(self.scanner.current()?)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.scanner.offset();
        let Some(ch) = self.current()? else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::at(start),
            });
        };

        let kind = match ch {
            '0'..='9' => self.number()?,
            '\'' | '"' => {
                self.quoted(ch)?;
                TokenKind::String
            }
            '`' => {
                self.template()?;
                TokenKind::Template
            }
            '.' => {
                while self.scanner.eat('.')? {}
                TokenKind::Dots
            }
            c if is_ident_start(c) => self.identifier_or_blob(start)?,
            c => self.punctuation(c, start)?,
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.scanner.offset()),
        })
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.current()? {
                Some(' ' | '\t' | '\r' | '\n') => self.scanner.advance(),
                Some('/') => match self.scanner.peek_next()? {
                    Some('/') => {
                        while !matches!(self.current()?, None | Some('\n')) {
                            self.scanner.advance();
                        }
                    }
                    Some('*') => self.block_comment()?,
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn block_comment(&mut self) -> Result<(), LexError> {
        let start = self.scanner.offset();
        self.scanner.advance();
        self.scanner.advance();
        loop {
            match self.current()? {
                None => {
                    return Err(LexError {
                        kind: ParseErrorKind::UnterminatedComment,
                        span: Span::new(start, self.scanner.offset()),
                    });
                }
                Some('*') if self.scanner.peek_next()? == Some('/') => {
                    self.scanner.advance();
                    self.scanner.advance();
                    return Ok(());
                }
                Some(_) => self.scanner.advance(),
            }
        }
    }

    fn digits(&mut self) -> Result<usize, LexError> {
        let mut count = 0;
        while matches!(self.current()?, Some('0'..='9')) {
            self.scanner.advance();
            count += 1;
        }
        Ok(count)
    }

    fn number(&mut self) -> Result<TokenKind, LexError> {
        self.digits()?;

        if self.current()? == Some('.') && matches!(self.scanner.peek_next()?, Some('0'..='9')) {
            self.scanner.advance();
            self.digits()?;
        }

        if matches!(self.current()?, Some('e' | 'E')) {
            let mark = self.scanner.save();
            self.scanner.advance();
            if matches!(self.current()?, Some('+' | '-')) {
                self.scanner.advance();
            }
            if self.digits()? == 0 {
                self.scanner.restore(mark);
            }
        }

        self.scanner.eat('n')?;
        Ok(TokenKind::Number)
    }

    fn quoted(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.scanner.offset();
        self.scanner.advance();
        loop {
            match self.current()? {
                None => {
                    return Err(LexError {
                        kind: ParseErrorKind::UnterminatedString { quote },
                        span: Span::new(start, self.scanner.offset()),
                    });
                }
                Some('\\') => {
                    self.scanner.advance();
                    self.scanner.advance();
                }
                Some(c) if c == quote => {
                    self.scanner.advance();
                    return Ok(());
                }
                Some(_) => self.scanner.advance(),
            }
        }
    }

    /// Back-quoted strings. `${...}` regions are tracked so that a `` ` ``
    /// inside them does not close the literal; they are not evaluated.
    fn template(&mut self) -> Result<(), LexError> {
        let start = self.scanner.offset();
        self.scanner.advance();
        let mut depth = 0usize;
        loop {
            match self.current()? {
                None => {
                    return Err(LexError {
                        kind: ParseErrorKind::UnterminatedString { quote: '`' },
                        span: Span::new(start, self.scanner.offset()),
                    });
                }
                Some('\\') => {
                    self.scanner.advance();
                    self.scanner.advance();
                }
                Some('`') if depth == 0 => {
                    self.scanner.advance();
                    return Ok(());
                }
                Some('$') if self.scanner.peek_next()? == Some('{') => {
                    self.scanner.advance();
                    self.scanner.advance();
                    depth += 1;
                }
                Some('}') if depth > 0 => {
                    self.scanner.advance();
                    depth -= 1;
                }
                Some(_) => self.scanner.advance(),
            }
        }
    }

    fn identifier_or_blob(&mut self, start: usize) -> Result<TokenKind, LexError> {
        while matches!(self.current()?, Some(c) if is_ident_continue(c)) {
            self.scanner.advance();
        }

        let word = &self.bytes[start..self.scanner.offset()];
        if self.current()? != Some('\'') {
            return Ok(TokenKind::Identifier);
        }
        let (kind, valid): (TokenKind, fn(char) -> bool) = match word {
            b"b16" => (TokenKind::Blob16, is_b16_char),
            b"b64" => (TokenKind::Blob64, is_b64_char),
            _ => return Ok(TokenKind::Identifier),
        };

        self.scanner.advance();
        loop {
            let at = self.scanner.offset();
            match self.current()? {
                None => {
                    return Err(LexError {
                        kind: ParseErrorKind::InvalidBlob {
                            message: "missing closing quote".to_string(),
                        },
                        span: Span::new(start, at),
                    });
                }
                Some('\'') => {
                    self.scanner.advance();
                    return Ok(kind);
                }
                Some(c) if valid(c) => self.scanner.advance(),
                Some(c) => {
                    return Err(LexError {
                        kind: ParseErrorKind::InvalidBlob {
                            message: format!("unexpected character '{}'", c),
                        },
                        span: Span::new(at, at + c.len_utf8()),
                    });
                }
            }
        }
    }

    fn punctuation(&mut self, ch: char, start: usize) -> Result<TokenKind, LexError> {
        for symbol in PUNCTUATION {
            if self.scanner.eat_str(symbol)? {
                return Ok(TokenKind::Punct);
            }
        }
        Err(LexError {
            kind: ParseErrorKind::UnexpectedCharacter { found: ch },
            span: Span::new(start, start + ch.len_utf8()),
        })
    }
}

/// Split `source` into tokens, ending with [`TokenKind::Eof`].
pub fn tokenize(source: &[u8]) -> Result<Tokens<'_>, ParseError> {
    Lexer::new(source).tokenize()
}
