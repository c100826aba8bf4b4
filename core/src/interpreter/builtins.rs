//! Functions available to every document without a binding of their own.

use std::rc::Rc;

use super::Context;
use super::interp::load_content;
use crate::api::content_name;
use crate::evaluator::{Engine, EvalError, RuntimeError};
use crate::values::{Function, Value};

pub const BUILTIN_NAMES: [&str; 3] = ["include", "include_text", "include_blob"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Include,
    IncludeText,
    IncludeBlob,
}

struct Builtin<'a> {
    kind: Kind,
    ctx: Rc<Context<'a>>,
}

pub(super) fn lookup<'a>(ctx: &Rc<Context<'a>>, name: &str) -> Option<Value<'a>> {
    let kind = match name {
        "include" => Kind::Include,
        "include_text" => Kind::IncludeText,
        "include_blob" => Kind::IncludeBlob,
        _ => return None,
    };
    Some(Value::Function(Rc::new(Builtin {
        kind,
        ctx: ctx.clone(),
    })))
}

impl<'a> Builtin<'a> {
    fn path<'v>(&self, args: &'v [Value<'a>]) -> Result<&'v str, EvalError> {
        if args.len() != 1 {
            return Err(RuntimeError::ArityMismatch {
                name: self.name().to_string(),
                expected: 1,
                got: args.len(),
                span: None,
            }
            .into());
        }
        args[0].as_str().ok_or_else(|| {
            RuntimeError::TypeMismatch {
                message: format!(
                    "{} expects a string path, got {}",
                    self.name(),
                    args[0].type_name()
                ),
                span: None,
            }
            .into()
        })
    }

    /// Load the document at `path` under its content name and return its
    /// root value.
    fn include(&self, engine: &mut Engine<'a>, path: &str) -> Result<Value<'a>, EvalError> {
        let bytes = self.ctx.storage.read_bytes(path)?;
        let name = content_name(&*self.ctx.digest, &bytes);
        tracing::debug!(path, document = %name, "include");
        load_content(engine, &self.ctx, &name, path, &bytes)?;
        engine.value(&name)
    }
}

impl<'a> Function<'a> for Builtin<'a> {
    fn name(&self) -> &str {
        match self.kind {
            Kind::Include => "include",
            Kind::IncludeText => "include_text",
            Kind::IncludeBlob => "include_blob",
        }
    }

    fn call(&self, engine: &mut Engine<'a>, args: &[Value<'a>]) -> Result<Value<'a>, EvalError> {
        let path = self.path(args)?;
        match self.kind {
            Kind::Include => self.include(engine, path),
            Kind::IncludeText => Ok(Value::str(&self.ctx.storage.read_text(path)?)),
            Kind::IncludeBlob => Ok(Value::blob(&self.ctx.storage.read_bytes(path)?)),
        }
    }
}
