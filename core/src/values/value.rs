use core::fmt;
use std::rc::Rc;

use crate::evaluator::{Engine, EvalError};
use crate::syntax::blob_literal::escape_blob;
use crate::syntax::string_literal::escape_string;

/// An evaluated JSONX value.
///
/// Compound variants are reference counted. Cloning a value never copies
/// its contents, and two clones are the same value for `===`.
#[derive(Clone)]
pub enum Value<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// Integer written with the `n` suffix.
    BigInt(i128),
    Str(Rc<str>),
    Blob(Rc<[u8]>),
    Array(Rc<[Value<'a>]>),
    Object(Rc<Object<'a>>),
    Function(Rc<dyn Function<'a> + 'a>),
}

/// Callable values: lambdas and builtins.
pub trait Function<'a> {
    /// Name used in messages, e.g. `include` or `<lambda>`.
    fn name(&self) -> &str;

    fn call(&self, engine: &mut Engine<'a>, args: &[Value<'a>]) -> Result<Value<'a>, EvalError>;
}

/// Insertion-ordered string-keyed map. Setting an existing key replaces its
/// value in place.
#[derive(Clone, Default)]
pub struct Object<'a> {
    entries: Vec<(Rc<str>, Value<'a>)>,
}

impl<'a> Object<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Rc<str>, value: Value<'a>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Copy every entry of `other` into `self`, overriding existing keys.
    pub fn extend_from(&mut self, other: &Object<'a>) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'a>)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| &**k)
    }
}

impl<'a> FromIterator<(Rc<str>, Value<'a>)> for Object<'a> {
    fn from_iter<I: IntoIterator<Item = (Rc<str>, Value<'a>)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl<'a> Value<'a> {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn blob(bytes: &[u8]) -> Self {
        Value::Blob(Rc::from(bytes))
    }

    pub fn array(items: Vec<Value<'a>>) -> Self {
        Value::Array(Rc::from(items))
    }

    pub fn object(object: Object<'a>) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Str(_) => "string",
            Value::Blob(_) => "blob",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// JavaScript truthiness. Blobs follow strings: empty is falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::Blob(b) => !b.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Address of the shared allocation behind a compound value.
    ///
    /// Strings and blobs are compared by content and have no identity here.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(Rc::as_ptr(items) as *const Value<'a> as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as usize),
            Value::Function(f) => Some(Rc::as_ptr(f) as *const () as usize),
            _ => None,
        }
    }

    /// `===`: primitives by value, compound values by identity.
    pub fn strict_equals(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (a, b) => match (a.identity(), b.identity()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<i128> {
        match self {
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object<'a>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Look up `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.as_object().and_then(|object| object.get(key))
    }
}

/// Structural equality, used by tests and hosts. Functions compare by
/// identity; numbers compare with `==`, so `NaN` is never equal.
impl<'a> PartialEq for Value<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a[..] == b[..],
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => self.strict_equals(other),
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", n)
    }
}

/// Prints values as JSONX source.
impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(f, *n),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::Str(s) => escape_string(f, s),
            Value::Blob(bytes) => escape_blob(f, bytes),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                if object.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (key, value)) in object.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_identifier(key) {
                        f.write_str(key)?;
                    } else {
                        escape_string(f, key)?;
                    }
                    write!(f, ": {}", value)?;
                }
                f.write_str(" }")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name()),
        }
    }
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<'a> From<bool> for Value<'a> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<'a> From<&str> for Value<'a> {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}
