//! Public API for the JSONX configuration language.
//!
//! A [`Session`] owns an evaluation engine and the host capabilities
//! ([`Storage`], [`Digest256`]) used by `include`. Documents are loaded by
//! name; every property of an object document becomes a binding that is
//! evaluated on first request.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use jsonx_core::api::{EngineOptions, MemoryStorage, Session};
//!
//! let storage = MemoryStorage::new().with_file("base.jx", "{ debug: false, port: 80 }");
//! let arena = Bump::new();
//! let mut session = Session::new(&arena, EngineOptions::default(), storage);
//!
//! session
//!     .load_source("site", "{ include('base.jx'), name: 'site' }")
//!     .unwrap();
//!
//! let site = session.value("site").unwrap();
//! assert_eq!(site.to_string(), "{ debug: false, port: 80, name: \"site\" }");
//! ```

pub mod error;
pub mod host;
pub mod options;
pub mod session;

pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use host::{
    Digest256, FileStorage, MemoryStorage, Sha256Digest, Storage, StorageError, content_name,
};
pub use options::EngineOptions;
pub use session::Session;
