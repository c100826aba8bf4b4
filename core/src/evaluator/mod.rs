//! Lazy evaluation engine.
//!
//! An [`Engine`] holds named bindings, each backed by a thunk. Asking for a
//! binding's value forces it on first use and memoizes the result; thunks
//! may ask for other bindings, so dependency order is discovered while
//! evaluating. A binding requested while it is being forced is a cycle.
//!
//! Two quotas bound the work done by one engine: a step quota (one step per
//! forcing) and a space quota charged with the structural size of every
//! forced result (see [`crate::values::measure`]).
//!
//! ## Example
//!
//! ```ignore
//! let mut engine = Engine::default();
//! engine.define_fn("z", |_| Ok(Value::Number(3.0)))?;
//! engine.define_fn("y", |e| {
//!     let z = e.value("z")?;
//!     Ok(Value::Number(z.as_number().unwrap_or(0.0) + 1.0))
//! })?;
//! assert_eq!(engine.value("y")?, Value::Number(4.0));
//! ```

mod engine;
mod error;


pub use engine::{BindingState, Engine, EngineLimits, Thunk};
pub use error::{EvalError, ResourceExceeded, RuntimeError};
