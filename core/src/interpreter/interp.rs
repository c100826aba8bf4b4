use std::rc::Rc;

use hashbrown::HashSet;

use super::Context;
use super::builtins;
use super::operators;
use crate::evaluator::{Engine, EvalError, RuntimeError, Thunk};
use crate::parser::{AnnotatedSource, BinaryOp, Expr, Member, ParsedExpr, parse_with_max_depth};
use crate::syntax::blob_literal::{BlobError, decode_b16, decode_b64};
use crate::values::{Function, Object, Value};

/// An object literal in property position, named by its binding path.
struct Scope {
    path: Rc<str>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    fn root(path: &str) -> Rc<Scope> {
        Rc::new(Scope {
            path: Rc::from(path),
            parent: None,
        })
    }

    fn child(&self, name: &str) -> String {
        format!("{}.{}", self.path, name)
    }
}

/// Lambda arguments, innermost call first.
struct Env<'a> {
    params: &'a [&'a str],
    args: Vec<Value<'a>>,
    parent: Option<Rc<Env<'a>>>,
}

#[derive(Clone)]
struct Frame<'a> {
    scope: Rc<Scope>,
    env: Option<Rc<Env<'a>>>,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

/// Register the bindings of a parsed document under `name`.
///
/// Either every binding of the document is defined or, when one of its
/// paths is already taken, none is.
pub fn load_document<'a>(
    engine: &mut Engine<'a>,
    ctx: &Rc<Context<'a>>,
    name: &str,
    parsed: &ParsedExpr<'a>,
) -> Result<(), EvalError> {
    tracing::debug!(document = name, "loading document");
    let mut bindings = Vec::new();
    collect(&mut bindings, ctx, parsed.ann, None, name, parsed.expr);

    {
        let mut seen = HashSet::with_capacity(bindings.len());
        for (path, _) in &bindings {
            if engine.contains(path) || !seen.insert(path.as_str()) {
                return Err(EvalError::DuplicateBinding { name: path.clone() });
            }
        }
    }
    for (path, thunk) in bindings {
        engine.define(path, thunk)?;
    }
    Ok(())
}

/// Parse `bytes` and load them as document `name`, unless that name is
/// already bound. `path` only labels parse errors.
pub fn load_content<'a>(
    engine: &mut Engine<'a>,
    ctx: &Rc<Context<'a>>,
    name: &str,
    path: &str,
    bytes: &[u8],
) -> Result<(), EvalError> {
    if engine.contains(name) {
        tracing::debug!(document = name, path, "content already loaded");
        return Ok(());
    }
    let source: &'a [u8] = ctx.arena.alloc_slice_copy(bytes);
    let parsed = parse_with_max_depth(ctx.arena, source, ctx.max_parse_depth).map_err(|error| {
        EvalError::Include {
            path: path.to_string(),
            error: Box::new(error),
        }
    })?;
    load_document(engine, ctx, name, &parsed)
}

fn thunk<'a>(f: impl Fn(&mut Engine<'a>) -> Result<Value<'a>, EvalError> + 'a) -> Thunk<'a> {
    Rc::new(f)
}

/// Thunks for `expr` bound at `path` and, when it is an object literal, for
/// each of its properties, parents before children.
fn collect<'a>(
    bindings: &mut Vec<(String, Thunk<'a>)>,
    ctx: &Rc<Context<'a>>,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    parent: Option<Rc<Scope>>,
    path: &str,
    expr: &'a Expr<'a>,
) {
    let Expr::Object(members) = expr else {
        let frame = Frame {
            scope: parent.unwrap_or_else(|| Scope::root(path)),
            env: None,
            ann,
        };
        let ctx = ctx.clone();
        let eval = thunk(move |engine| {
            let _guard = ctx.enter()?;
            Evaluator::new(&ctx, engine).eval(&frame, expr)
        });
        bindings.push((path.to_string(), eval));
        return;
    };

    let scope = Rc::new(Scope {
        path: Rc::from(path),
        parent,
    });
    let frame = Frame {
        scope: scope.clone(),
        env: None,
        ann,
    };
    let thunk_ctx = ctx.clone();
    let object = thunk(move |engine| {
        let _guard = thunk_ctx.enter()?;
        Evaluator::new(&thunk_ctx, engine).object_binding(&frame, members)
    });
    bindings.push((path.to_string(), object));

    for (i, member) in members.iter().enumerate() {
        let Member::Property { key, value } = member else {
            continue;
        };
        // Only the last occurrence of a key is bound.
        let overridden = members[i + 1..]
            .iter()
            .any(|m| matches!(m, Member::Property { key: k, .. } if k == key));
        if !overridden {
            collect(bindings, ctx, ann, Some(scope.clone()), &scope.child(key), value);
        }
    }
}

fn fail<'a>(frame: &Frame<'a>, expr: &Expr<'a>, err: RuntimeError) -> EvalError {
    match frame.ann.span_of(expr) {
        Some(span) => err.at(&span).into(),
        None => err.into(),
    }
}

fn number<'a>(text: &str) -> Result<Value<'a>, RuntimeError> {
    let invalid = || RuntimeError::InvalidNumber {
        text: text.to_string(),
        span: None,
    };
    match text.strip_suffix('n') {
        Some(digits) if digits.contains(['.', 'e', 'E']) => Err(invalid()),
        Some(digits) => digits.parse::<i128>().map(Value::BigInt).map_err(|_| invalid()),
        None => text.parse::<f64>().map(Value::Number).map_err(|_| invalid()),
    }
}

struct Evaluator<'a, 'e> {
    ctx: &'e Rc<Context<'a>>,
    engine: &'e mut Engine<'a>,
}

impl<'a, 'e> Evaluator<'a, 'e> {
    fn new(ctx: &'e Rc<Context<'a>>, engine: &'e mut Engine<'a>) -> Self {
        Self { ctx, engine }
    }

    /// Value of an object bound in property position: its properties are
    /// forced in member order, spread members merged in between.
    fn object_binding(
        &mut self,
        frame: &Frame<'a>,
        members: &'a [Member<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let mut object = Object::new();
        for member in members {
            match member {
                Member::Property { key, .. } => {
                    let value = self.engine.value(&frame.scope.child(key))?;
                    object.insert(Rc::from(*key), value);
                }
                Member::Spread(expr) => self.spread(frame, &mut object, expr)?,
            }
        }
        Ok(Value::object(object))
    }

    fn spread(
        &mut self,
        frame: &Frame<'a>,
        object: &mut Object<'a>,
        expr: &'a Expr<'a>,
    ) -> Result<(), EvalError> {
        match self.eval(frame, expr)? {
            Value::Object(included) => {
                object.extend_from(&included);
                Ok(())
            }
            other => Err(fail(
                frame,
                expr,
                RuntimeError::TypeMismatch {
                    message: format!("spread member must be an object, got {}", other.type_name()),
                    span: None,
                },
            )),
        }
    }

    fn eval(&mut self, frame: &Frame<'a>, expr: &'a Expr<'a>) -> Result<Value<'a>, EvalError> {
        match expr {
            Expr::Number(text) => number(text).map_err(|e| fail(frame, expr, e)),
            Expr::String(s) => Ok(Value::str(s)),
            Expr::Boolean(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Blob16(text) => self.blob(frame, expr, decode_b16(text)),
            Expr::Blob64(text) => self.blob(frame, expr, decode_b64(text)),
            Expr::Identifier(name) => self.lookup(frame, expr, name),
            Expr::RelativeRef { level, name } => self.relative(frame, expr, *level, name),
            Expr::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(frame, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(values))
            }
            Expr::Object(members) => {
                // Not in property position: a plain value, no new scope.
                let mut object = Object::new();
                for member in members.iter() {
                    match member {
                        Member::Property { key, value } => {
                            let value = self.eval(frame, value)?;
                            object.insert(Rc::from(*key), value);
                        }
                        Member::Spread(expr) => self.spread(frame, &mut object, expr)?,
                    }
                }
                Ok(Value::object(object))
            }
            Expr::Call { callee, args } => self.call(frame, expr, callee, args),
            Expr::Lambda { params, body } => Ok(Value::Function(Rc::new(Lambda {
                ctx: self.ctx.clone(),
                params: *params,
                body: *body,
                frame: frame.clone(),
            }))),
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let left = self.eval(frame, left)?;
                if left.is_truthy() {
                    self.eval(frame, right)
                } else {
                    Ok(left)
                }
            }
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let left = self.eval(frame, left)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(frame, right)
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(frame, left)?;
                let right = self.eval(frame, right)?;
                operators::binary(*op, &left, &right).map_err(|e| fail(frame, expr, e))
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval(frame, operand)?;
                operators::unary(*op, &operand).map_err(|e| fail(frame, expr, e))
            }
        }
    }

    fn blob(
        &self,
        frame: &Frame<'a>,
        expr: &'a Expr<'a>,
        decoded: Result<Vec<u8>, BlobError>,
    ) -> Result<Value<'a>, EvalError> {
        decoded.map(|bytes| Value::blob(&bytes)).map_err(|e| {
            fail(
                frame,
                expr,
                RuntimeError::InvalidBlob {
                    message: e.to_string(),
                    span: None,
                },
            )
        })
    }

    /// Lambda parameters, then enclosing scopes innermost first, then
    /// builtins.
    fn lookup(
        &mut self,
        frame: &Frame<'a>,
        expr: &'a Expr<'a>,
        name: &str,
    ) -> Result<Value<'a>, EvalError> {
        let mut env = frame.env.as_deref();
        while let Some(e) = env {
            if let Some(i) = e.params.iter().position(|p| *p == name) {
                return Ok(e.args[i].clone());
            }
            env = e.parent.as_deref();
        }

        let mut scope = Some(&frame.scope);
        while let Some(s) = scope {
            let path = s.child(name);
            if self.engine.contains(&path) {
                return self.engine.value(&path);
            }
            scope = s.parent.as_ref();
        }

        if let Some(builtin) = builtins::lookup(self.ctx, name) {
            return Ok(builtin);
        }

        Err(fail(
            frame,
            expr,
            RuntimeError::UnknownName {
                name: name.to_string(),
                span: None,
            },
        ))
    }

    /// `.name` looks in the current scope only, each extra dot one scope
    /// further out.
    fn relative(
        &mut self,
        frame: &Frame<'a>,
        expr: &'a Expr<'a>,
        level: usize,
        name: &str,
    ) -> Result<Value<'a>, EvalError> {
        let mut scope = &frame.scope;
        for _ in 0..level {
            scope = match &scope.parent {
                Some(parent) => parent,
                None => {
                    return Err(fail(
                        frame,
                        expr,
                        RuntimeError::ScopeOutOfRange {
                            level,
                            name: name.to_string(),
                            span: None,
                        },
                    ));
                }
            };
        }

        let path = scope.child(name);
        if !self.engine.contains(&path) {
            return Err(fail(
                frame,
                expr,
                RuntimeError::UnknownName {
                    name: name.to_string(),
                    span: None,
                },
            ));
        }
        self.engine.value(&path)
    }

    fn call(
        &mut self,
        frame: &Frame<'a>,
        expr: &'a Expr<'a>,
        callee: &'a Expr<'a>,
        args: &'a [&'a Expr<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let function = match self.eval(frame, callee)? {
            Value::Function(function) => function,
            other => {
                return Err(fail(
                    frame,
                    expr,
                    RuntimeError::NotCallable {
                        type_name: other.type_name(),
                        span: None,
                    },
                ));
            }
        };

        let args = args
            .iter()
            .map(|arg| self.eval(frame, arg))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(function = function.name(), args = args.len(), "call");
        function.call(self.engine, &args).map_err(|err| match err {
            EvalError::Runtime(e) => fail(frame, expr, e),
            other => other,
        })
    }
}

struct Lambda<'a> {
    ctx: Rc<Context<'a>>,
    params: &'a [&'a str],
    body: &'a Expr<'a>,
    frame: Frame<'a>,
}

impl<'a> Function<'a> for Lambda<'a> {
    fn name(&self) -> &str {
        "<lambda>"
    }

    fn call(&self, engine: &mut Engine<'a>, args: &[Value<'a>]) -> Result<Value<'a>, EvalError> {
        if args.len() != self.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: self.name().to_string(),
                expected: self.params.len(),
                got: args.len(),
                span: None,
            }
            .into());
        }

        let _guard = self.ctx.enter()?;
        let frame = Frame {
            scope: self.frame.scope.clone(),
            env: Some(Rc::new(Env {
                params: self.params,
                args: args.to_vec(),
                parent: self.frame.env.clone(),
            })),
            ann: self.frame.ann,
        };
        Evaluator::new(&self.ctx, engine).eval(&frame, self.body)
    }
}
