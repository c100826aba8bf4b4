use std::rc::Rc;

use hashbrown::HashMap;

use super::error::{EvalError, ResourceExceeded};
use crate::values::{Value, Visited, measure};

/// Deferred computation producing the value of a binding. It may force
/// other bindings through the engine it is given.
pub type Thunk<'a> = Rc<dyn Fn(&mut Engine<'a>) -> Result<Value<'a>, EvalError> + 'a>;

/// Quotas for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Number of bindings that may be forced.
    pub max_steps: u64,
    /// Total measured size of all forced results.
    pub max_bytes: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            max_bytes: 1_000_000,
        }
    }
}

/// Lifecycle of a binding. `Done` is terminal.
#[derive(Debug, Clone)]
pub enum BindingState<'a> {
    Unevaluated,
    InProgress,
    Done(Value<'a>),
}

struct Binding<'a> {
    state: BindingState<'a>,
    thunk: Thunk<'a>,
}

/// Lazy, memoizing store of named bindings.
///
/// Each binding is forced at most once successfully. Forcing a binding
/// costs one step and charges the measured size of its result against the
/// space quota; neither quota is ever refunded.
pub struct Engine<'a> {
    bindings: HashMap<String, Binding<'a>>,
    order: Vec<String>,
    limits: EngineLimits,
    steps_remaining: u64,
    bytes_remaining: u64,
}

impl<'a> Engine<'a> {
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            bindings: HashMap::new(),
            order: Vec::new(),
            limits,
            steps_remaining: limits.max_steps,
            bytes_remaining: limits.max_bytes,
        }
    }

    /// Register `name`. Names are never replaced once defined.
    pub fn define(&mut self, name: impl Into<String>, thunk: Thunk<'a>) -> Result<(), EvalError> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(EvalError::DuplicateBinding { name });
        }
        tracing::debug!(binding = %name, "defined binding");
        self.bindings.insert(
            name.clone(),
            Binding {
                state: BindingState::Unevaluated,
                thunk,
            },
        );
        self.order.push(name);
        Ok(())
    }

    /// Convenience wrapper around [`Engine::define`] for closures.
    pub fn define_fn<F>(&mut self, name: impl Into<String>, f: F) -> Result<(), EvalError>
    where
        F: Fn(&mut Engine<'a>) -> Result<Value<'a>, EvalError> + 'a,
    {
        self.define(name, Rc::new(f))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn state(&self, name: &str) -> Option<&BindingState<'a>> {
        self.bindings.get(name).map(|b| &b.state)
    }

    /// Binding names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    pub fn steps_remaining(&self) -> u64 {
        self.steps_remaining
    }

    pub fn bytes_remaining(&self) -> u64 {
        self.bytes_remaining
    }

    /// Value of binding `name`, forcing it (and whatever it depends on) if
    /// needed.
    ///
    /// A failed forcing leaves the binding unevaluated, so asking again
    /// reports the failure again. Bindings already done are unaffected by
    /// later failures, including exhausted quotas.
    pub fn value(&mut self, name: &str) -> Result<Value<'a>, EvalError> {
        let binding = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| EvalError::UnknownBinding {
                name: name.to_string(),
            })?;

        match &binding.state {
            BindingState::Done(value) => {
                tracing::debug!(binding = name, "memoized");
                return Ok(value.clone());
            }
            BindingState::InProgress => {
                return Err(EvalError::Cycle {
                    name: name.to_string(),
                });
            }
            BindingState::Unevaluated => {}
        }

        if self.steps_remaining == 0 {
            return Err(ResourceExceeded::TimeLimit {
                max_steps: self.limits.max_steps,
            }
            .into());
        }
        self.steps_remaining -= 1;
        binding.state = BindingState::InProgress;
        let thunk = binding.thunk.clone();

        tracing::trace!(binding = name, steps_remaining = self.steps_remaining, "forcing");
        let result = thunk(self).and_then(|value| self.charge(value));

        if let Some(binding) = self.bindings.get_mut(name) {
            binding.state = match &result {
                Ok(value) => BindingState::Done(value.clone()),
                Err(_) => BindingState::Unevaluated,
            };
        }
        if let Err(err) = &result {
            tracing::trace!(binding = name, error = %err, "forcing failed");
        }
        result
    }

    fn charge(&mut self, value: Value<'a>) -> Result<Value<'a>, EvalError> {
        let needed = measure(&value, &mut Visited::new());
        if needed > self.bytes_remaining {
            return Err(ResourceExceeded::SpaceLimit {
                needed,
                remaining: self.bytes_remaining,
            }
            .into());
        }
        self.bytes_remaining -= needed;
        Ok(value)
    }
}

impl<'a> Default for Engine<'a> {
    fn default() -> Self {
        Self::new(EngineLimits::default())
    }
}
