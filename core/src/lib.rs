//! JSONX: a JSON superset for configuration, with comments, references,
//! arithmetic, lambdas and content-addressed `include`, evaluated lazily
//! under step and space quotas.

pub mod api;
pub mod evaluator;
pub mod interpreter;
pub mod js64;
pub mod parser;
pub mod scanner;
pub mod syntax;
pub mod values;

pub use api::{EngineOptions, Error, Session};
pub use values::Value;
