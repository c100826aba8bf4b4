//! JSONX - JSON for configuration, with comments, references, arithmetic,
//! lambdas and content-addressed includes.
//!
//! # Quick Start
//!
//! ```
//! use jsonx::{EngineOptions, MemoryStorage, Session};
//! use bumpalo::Bump;
//!
//! let storage = MemoryStorage::new().with_file("defaults.jx", "{ retries: 3, verbose: false }");
//!
//! // Documents and their values live in the arena
//! let arena = Bump::new();
//! let mut session = Session::new(&arena, EngineOptions::default(), storage);
//!
//! session
//!     .load_source(
//!         "service",
//!         "{
//!            include('defaults.jx'),
//!            // seconds
//!            step: 10,
//!            timeout: step * 3,
//!            name: 'api-' + 'v2',
//!          }",
//!     )
//!     .unwrap();
//!
//! assert_eq!(session.value("service.timeout").unwrap().as_number(), Some(30.0));
//! assert_eq!(
//!     session.value("service").unwrap().to_string(),
//!     r#"{ retries: 3, verbose: false, step: 10, timeout: 30, name: "api-v2" }"#
//! );
//! ```
//!
//! Properties that arrive through a spread (`include(...)` as an object
//! member) are part of the object's value but are not bindings themselves,
//! so they cannot be referenced by name.
//!
//! # Errors
//!
//! Every failure is an [`Error`]. Parse errors carry [`Diagnostic`]s with
//! source spans, which [`render_error`] prints with `ariadne`.

pub mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from jsonx_core
pub use jsonx_core::api::{
    Diagnostic, Digest256, EngineOptions, Error, FileStorage, MemoryStorage, RelatedInfo, Session,
    Severity, Sha256Digest, Storage, StorageError, content_name,
};

// Re-export the building blocks
pub use jsonx_core::evaluator::{self, Engine, EngineLimits, EvalError};
pub use jsonx_core::parser::{self, Expr, ParseError, parse};
pub use jsonx_core::values::{self, Object, Value};
pub use jsonx_core::{js64, scanner};
