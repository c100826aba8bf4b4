//! A session: one engine, the documents loaded into it and the host
//! capabilities their includes use.

use std::rc::Rc;

use bumpalo::Bump;

use super::host::{Digest256, Sha256Digest, Storage, content_name};
use super::{EngineOptions, Error};
use crate::evaluator::Engine;
use crate::interpreter::{Context, load_content, load_document};
use crate::parser::parse_with_max_depth;
use crate::values::Value;

/// Documents are parsed into `arena`, which must outlive every value the
/// session hands out.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use jsonx_core::api::{EngineOptions, MemoryStorage, Session};
///
/// let arena = Bump::new();
/// let mut session = Session::new(&arena, EngineOptions::default(), MemoryStorage::new());
/// session.load_source("config", "{ port: 8000 + 80 }").unwrap();
/// assert_eq!(session.value("config.port").unwrap().as_number(), Some(8080.0));
/// ```
pub struct Session<'a> {
    arena: &'a Bump,
    options: EngineOptions,
    ctx: Rc<Context<'a>>,
    engine: Engine<'a>,
}

impl<'a> Session<'a> {
    /// Create a session naming included content with SHA-256.
    pub fn new(arena: &'a Bump, options: EngineOptions, storage: impl Storage + 'a) -> Self {
        Self::with_digest(arena, options, storage, Sha256Digest)
    }

    pub fn with_digest(
        arena: &'a Bump,
        options: EngineOptions,
        storage: impl Storage + 'a,
        digest: impl Digest256 + 'a,
    ) -> Self {
        let ctx = Rc::new(Context::new(
            arena,
            Rc::new(storage),
            Rc::new(digest),
            options.max_depth,
            options.max_parse_depth,
        ));
        let engine = Engine::new(options.limits());
        Self {
            arena,
            options,
            ctx,
            engine,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Parse `source` and register it as document `name`. Nothing is
    /// evaluated until a value is requested.
    pub fn load_source(&mut self, name: &str, source: impl AsRef<[u8]>) -> Result<(), Error> {
        let source: &'a [u8] = self.arena.alloc_slice_copy(source.as_ref());
        let parsed = parse_with_max_depth(self.arena, source, self.options.max_parse_depth)?;
        load_document(&mut self.engine, &self.ctx, name, &parsed)?;
        Ok(())
    }

    /// Load a document from storage under its content name, which is
    /// returned. Loading the same content twice is a no-op.
    pub fn load_file(&mut self, path: &str) -> Result<String, Error> {
        let bytes = self.ctx.storage.read_bytes(path)?;
        let name = content_name(&*self.ctx.digest, &bytes);
        load_content(&mut self.engine, &self.ctx, &name, path, &bytes)?;
        Ok(name)
    }

    /// Value of a binding, e.g. `config` or `config.server.port`.
    pub fn value(&mut self, path: &str) -> Result<Value<'a>, Error> {
        Ok(self.engine.value(path)?)
    }

    pub fn engine(&self) -> &Engine<'a> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<'a> {
        &mut self.engine
    }
}
