//! Runtime values produced by evaluation.

pub mod measure;
mod value;

pub use measure::{Visited, measure};
pub use value::{Function, Object, Value};

#[cfg(test)]
mod value_test;
