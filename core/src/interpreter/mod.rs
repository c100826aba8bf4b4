//! Lowering of parsed documents into engine bindings.
//!
//! A document is an expression; when it is an object, each property `k` of
//! an object literal at binding path `P` becomes its own binding `P.k`,
//! recursively for object literals in property position. Those object
//! literals (and the document root) are the scopes that identifiers and
//! relative references resolve against.

mod builtins;
mod interp;
mod operators;


use std::cell::Cell;
use std::rc::Rc;

use bumpalo::Bump;

use crate::api::{Digest256, Storage};
use crate::evaluator::{EvalError, ResourceExceeded};

pub use builtins::BUILTIN_NAMES;
pub use interp::{load_content, load_document};
pub use operators::{binary, unary};

/// Everything evaluation needs besides the engine: the arena holding
/// included documents, the host capabilities and the call depth limit.
pub struct Context<'a> {
    pub arena: &'a Bump,
    pub storage: Rc<dyn Storage + 'a>,
    pub digest: Rc<dyn Digest256 + 'a>,
    pub max_depth: usize,
    pub max_parse_depth: usize,
    depth: Cell<usize>,
}

impl<'a> Context<'a> {
    pub fn new(
        arena: &'a Bump,
        storage: Rc<dyn Storage + 'a>,
        digest: Rc<dyn Digest256 + 'a>,
        max_depth: usize,
        max_parse_depth: usize,
    ) -> Self {
        Self {
            arena,
            storage,
            digest,
            max_depth,
            max_parse_depth,
            depth: Cell::new(0),
        }
    }

    /// Current nesting of lambda calls and binding forcings.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Count one level of nesting (a lambda call or a binding forced from
    /// another one) until the guard is dropped.
    pub(crate) fn enter(&self) -> Result<DepthGuard<'_>, EvalError> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(ResourceExceeded::StackOverflow {
                depth,
                max_depth: self.max_depth,
            }
            .into());
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }
}

pub(crate) struct DepthGuard<'c> {
    depth: &'c Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}
