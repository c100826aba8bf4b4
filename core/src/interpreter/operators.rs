//! Strict (non short-circuit) operators.

use std::cmp::Ordering;

use crate::evaluator::RuntimeError;
use crate::parser::{BinaryOp, UnaryOp};
use crate::values::Value;

fn mismatch(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> RuntimeError {
    RuntimeError::TypeMismatch {
        message: format!(
            "cannot apply '{}' to {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ),
        span: None,
    }
}

fn overflow() -> RuntimeError {
    RuntimeError::Overflow { span: None }
}

fn concat<T: Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

fn add<'a>(left: &Value<'a>, right: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    Ok(match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (Value::BigInt(a), Value::BigInt(b)) => Value::BigInt(a.checked_add(*b).ok_or_else(overflow)?),
        (Value::Str(a), Value::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Value::Str(s.into())
        }
        (Value::Blob(a), Value::Blob(b)) => Value::Blob(concat(&a[..], &b[..]).into()),
        (Value::Array(a), Value::Array(b)) => Value::Array(concat(&a[..], &b[..]).into()),
        _ => return Err(mismatch(BinaryOp::Add, left, right)),
    })
}

fn arithmetic<'a>(op: BinaryOp, left: &Value<'a>, right: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => unreachable!("not an arithmetic operator: {:?}", op),
        })),
        (Value::BigInt(a), Value::BigInt(b)) => {
            let result = match op {
                BinaryOp::Sub => a.checked_sub(*b),
                BinaryOp::Mul => a.checked_mul(*b),
                BinaryOp::Div | BinaryOp::Rem if *b == 0 => {
                    return Err(RuntimeError::DivisionByZero { span: None });
                }
                BinaryOp::Div => a.checked_div(*b),
                BinaryOp::Rem => a.checked_rem(*b),
                _ => unreachable!("not an arithmetic operator: {:?}", op),
            };
            Ok(Value::BigInt(result.ok_or_else(overflow)?))
        }
        _ => Err(mismatch(op, left, right)),
    }
}

fn compare<'a>(op: BinaryOp, left: &Value<'a>, right: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => return Err(mismatch(op, left, right)),
    };
    // Comparisons involving NaN are false.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => unreachable!("not a comparison operator: {:?}", op),
    }))
}

/// Apply a binary operator to already evaluated operands. `&&` and `||`
/// are handled by the caller since they do not always evaluate both sides.
pub fn binary<'a>(op: BinaryOp, left: &Value<'a>, right: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, left, right)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => compare(op, left, right),
        BinaryOp::Eq | BinaryOp::StrictEq => Ok(Value::Bool(left.strict_equals(right))),
        BinaryOp::Ne | BinaryOp::StrictNe => Ok(Value::Bool(!left.strict_equals(right))),
        BinaryOp::And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
        BinaryOp::Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
    }
}

pub fn unary<'a>(op: UnaryOp, operand: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Neg, Value::BigInt(n)) => Ok(Value::BigInt(n.checked_neg().ok_or_else(overflow)?)),
        (UnaryOp::Neg, other) => Err(RuntimeError::TypeMismatch {
            message: format!("cannot negate {}", other.type_name()),
            span: None,
        }),
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
    }
}
