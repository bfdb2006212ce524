//! 运算符实现：算术、幂、比较、一元
//!
//! 这里的错误没有位置信息，由调用方通过 `RuntimeError::at` 补上。

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{Number, Value};
use nilo_syntax::ast::{BinaryOp, CompareOp, UnaryOp};
use std::cmp::Ordering;

fn unsupported(symbol: &str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        symbol,
        lhs.type_name(),
        rhs.type_name()
    ))
}

fn overflow() -> RuntimeError {
    RuntimeError::overflow("integer result out of range")
}

pub(crate) fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return match (a, b) {
            (Number::Int(x), Number::Int(y)) => int_arith(op, x, y),
            (a, b) => float_arith(op, a.to_f64(), b.to_f64()),
        };
    }

    match (op, lhs, rhs) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{}{}", a, b))),
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinaryOp::Mul, Value::Str(s), count) | (BinaryOp::Mul, count, Value::Str(s)) => {
            match count.as_number() {
                Some(Number::Int(n)) => {
                    let total = repeat_len(s.len(), n)?;
                    let mut out = String::new();
                    out.try_reserve(total)
                        .map_err(|_| RuntimeError::overflow("repeated string is too long"))?;
                    while out.len() < total {
                        out.push_str(s);
                    }
                    Ok(Value::str(out))
                }
                _ => Err(unsupported(op.symbol(), lhs, rhs)),
            }
        }
        (BinaryOp::Mul, Value::List(items), count) | (BinaryOp::Mul, count, Value::List(items)) => {
            match count.as_number() {
                Some(Number::Int(n)) => {
                    let items = items.borrow();
                    let total = repeat_len(items.len(), n)?;
                    let mut out = Vec::new();
                    out.try_reserve(total)
                        .map_err(|_| RuntimeError::overflow("repeated list is too long"))?;
                    while out.len() < total {
                        out.extend(items.iter().cloned());
                    }
                    Ok(Value::list(out))
                }
                _ => Err(unsupported(op.symbol(), lhs, rhs)),
            }
        }
        _ => Err(unsupported(op.symbol(), lhs, rhs)),
    }
}

/// `len * count`，负数次数按 0 处理
fn repeat_len(len: usize, count: i64) -> RuntimeResult<usize> {
    usize::try_from(count.max(0))
        .ok()
        .and_then(|count| len.checked_mul(count))
        .ok_or_else(|| RuntimeError::overflow("repeat count too large"))
}

fn int_arith(op: BinaryOp, x: i64, y: i64) -> RuntimeResult<Value> {
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div => {
            if y == 0 {
                return Err(RuntimeError::zero_division("division by zero"));
            }
            return Ok(Value::Float(x as f64 / y as f64));
        }
        BinaryOp::FloorDiv | BinaryOp::Mod if y == 0 => {
            return Err(RuntimeError::zero_division(
                "integer division or modulo by zero",
            ))
        }
        // 向下取整，余数符号跟随除数
        BinaryOp::FloorDiv => x.checked_div(y).zip(x.checked_rem(y)).map(|(q, r)| {
            if r != 0 && ((r < 0) != (y < 0)) {
                q - 1
            } else {
                q
            }
        }),
        BinaryOp::Mod => x.checked_rem(y).map(|r| {
            if r != 0 && ((r < 0) != (y < 0)) {
                r + y
            } else {
                r
            }
        }),
    };
    result.map(Value::Int).ok_or_else(overflow)
}

fn float_arith(op: BinaryOp, x: f64, y: f64) -> RuntimeResult<Value> {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod if y == 0.0 => {
            return Err(RuntimeError::zero_division("float division by zero"))
        }
        BinaryOp::Div => x / y,
        BinaryOp::FloorDiv => (x / y).floor(),
        BinaryOp::Mod => {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        }
    };
    Ok(Value::Float(result))
}

/// `base ** exponent`：两个 int 且指数非负时结果为 int
pub(crate) fn power(base: &Value, exponent: &Value) -> RuntimeResult<Value> {
    match (base.as_number(), exponent.as_number()) {
        (Some(Number::Int(b)), Some(Number::Int(e))) if e >= 0 => u32::try_from(e)
            .ok()
            .and_then(|e| b.checked_pow(e))
            .map(Value::Int)
            .ok_or_else(overflow),
        (Some(b), Some(e)) => {
            let (x, y) = (b.to_f64(), e.to_f64());
            if x == 0.0 && y < 0.0 {
                return Err(RuntimeError::zero_division(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            Ok(Value::Float(x.powf(y)))
        }
        _ => Err(unsupported("**", base, exponent)),
    }
}

fn ordering(op: CompareOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Option<Ordering>> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(match (a, b) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        });
    }
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => Err(RuntimeError::type_error(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op.symbol(),
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

pub(crate) fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    let result = match op {
        CompareOp::Eq => lhs == rhs,
        CompareOp::Neq => lhs != rhs,
        CompareOp::Is => lhs.is_identical(rhs),
        CompareOp::IsNot => !lhs.is_identical(rhs),
        CompareOp::Lt => ordering(op, lhs, rhs)? == Some(Ordering::Less),
        CompareOp::Gt => ordering(op, lhs, rhs)? == Some(Ordering::Greater),
        CompareOp::Leq => matches!(
            ordering(op, lhs, rhs)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Geq => matches!(
            ordering(op, lhs, rhs)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
    };
    Ok(Value::Bool(result))
}

pub(crate) fn unary(op: UnaryOp, operand: &Value) -> RuntimeResult<Value> {
    match (op, operand.as_number()) {
        (UnaryOp::Not, _) => Ok(Value::Bool(!operand.truthy())),
        (UnaryOp::Neg, Some(Number::Int(n))) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Some(Number::Float(x))) => Ok(Value::Float(-x)),
        (UnaryOp::Pos, Some(Number::Int(n))) => Ok(Value::Int(n)),
        (UnaryOp::Pos, Some(Number::Float(x))) => Ok(Value::Float(x)),
        (op, None) => Err(RuntimeError::type_error(format!(
            "bad operand type for unary {}: '{}'",
            op.symbol(),
            operand.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_semantics() {
        assert_eq!(binary(BinaryOp::FloorDiv, &Value::Int(-7), &Value::Int(2)).unwrap(), Value::Int(-4));
        assert_eq!(binary(BinaryOp::Mod, &Value::Int(-7), &Value::Int(2)).unwrap(), Value::Int(1));
        assert_eq!(binary(BinaryOp::Mod, &Value::Int(7), &Value::Int(-2)).unwrap(), Value::Int(-1));
        assert_eq!(binary(BinaryOp::FloorDiv, &Value::Float(7.5), &Value::Int(2)).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_division_errors() {
        let err = binary(BinaryOp::Div, &Value::Int(1), &Value::Int(0)).unwrap_err();
        assert_eq!(err.to_string(), "ZeroDivisionError: division by zero");
        let err = binary(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1)).unwrap_err();
        assert!(err.to_string().starts_with("OverflowError"));
        assert!(binary(BinaryOp::FloorDiv, &Value::Int(i64::MIN), &Value::Int(-1)).is_err());
    }

    #[test]
    fn test_power() {
        assert_eq!(power(&Value::Int(2), &Value::Int(3)).unwrap(), Value::Int(8));
        assert_eq!(power(&Value::Int(2), &Value::Int(-1)).unwrap(), Value::Float(0.5));
        assert!(power(&Value::Int(10), &Value::Int(100)).is_err());
        let err = power(&Value::None, &Value::Int(2)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: unsupported operand type(s) for **: 'NoneType' and 'int'"
        );
    }

    #[test]
    fn test_sequences() {
        assert_eq!(binary(BinaryOp::Add, &"ab".into(), &"c".into()).unwrap(), Value::str("abc"));
        assert_eq!(binary(BinaryOp::Mul, &Value::Int(2), &"ab".into()).unwrap(), Value::str("abab"));
        let joined = binary(
            BinaryOp::Add,
            &Value::list(vec![Value::Int(1)]),
            &Value::list(vec![Value::Int(2)]),
        )
        .unwrap();
        assert_eq!(joined, Value::list(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_repeat_overflow() {
        for seq in [Value::str("ab"), Value::list(vec![Value::Int(1), Value::Int(2)])] {
            let err = binary(BinaryOp::Mul, &seq, &Value::Int(i64::MAX)).unwrap_err();
            assert!(err.to_string().starts_with("OverflowError"), "{}", err);
        }
        assert_eq!(binary(BinaryOp::Mul, &Value::str(""), &Value::Int(i64::MAX)).unwrap(), Value::str(""));
        assert_eq!(binary(BinaryOp::Mul, &Value::Int(-3), &"ab".into()).unwrap(), Value::str(""));
        assert_eq!(
            binary(BinaryOp::Mul, &Value::list(vec![Value::Int(1)]), &Value::Int(3)).unwrap(),
            Value::list(vec![Value::Int(1); 3])
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(CompareOp::Lt, &Value::Int(1), &Value::Float(1.5)).unwrap(), Value::Bool(true));
        assert_eq!(compare(CompareOp::Geq, &"b".into(), &"a".into()).unwrap(), Value::Bool(true));
        assert_eq!(compare(CompareOp::Is, &Value::None, &Value::None).unwrap(), Value::Bool(true));
        let err = compare(CompareOp::Lt, &Value::None, &Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: '<' not supported between instances of 'NoneType' and 'int'"
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(unary(UnaryOp::Neg, &Value::Int(3)).unwrap(), Value::Int(-3));
        assert_eq!(unary(UnaryOp::Not, &Value::str("")).unwrap(), Value::Bool(true));
        assert!(unary(UnaryOp::Neg, &Value::None).is_err());
    }
}
