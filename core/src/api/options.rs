//! Configuration options for a JSONX session.

use crate::evaluator::EngineLimits;

/// Configuration options for a [`Session`](super::Session).
///
/// # Example
///
/// ```
/// use jsonx_core::api::EngineOptions;
///
/// let options = EngineOptions {
///     max_steps: 500,
///     ..EngineOptions::default()
/// };
/// assert_eq!(options.max_bytes, 1_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Number of bindings that may be forced during the session.
    ///
    /// Default: 10_000
    pub max_steps: u64,

    /// Total structural size of all forced results.
    ///
    /// Default: 1_000_000
    pub max_bytes: u64,

    /// Maximum nesting of lambda calls and bindings forced from other
    /// bindings. Every level recurses on the native stack, so the default
    /// leaves headroom on a 2 MiB thread.
    ///
    /// Default: 64
    pub max_depth: usize,

    /// Maximum expression nesting accepted by the parser.
    ///
    /// Default: 100
    pub max_parse_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            max_bytes: 1_000_000,
            max_depth: 64,
            max_parse_depth: crate::parser::DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineOptions {
    pub fn limits(&self) -> EngineLimits {
        EngineLimits {
            max_steps: self.max_steps,
            max_bytes: self.max_bytes,
        }
    }
}
