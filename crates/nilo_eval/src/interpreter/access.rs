//! 对象模型上的访问：属性、索引、调用
//!
//! 访问链、赋值和增量赋值共用这些函数。错误不带位置。

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{Number, Value};

pub(crate) fn get_attribute(value: &Value, name: &str) -> RuntimeResult<Value> {
    match value {
        Value::Object(obj) => obj
            .get(name)
            .ok_or_else(|| RuntimeError::attribute_error(value.type_name(), name)),
        other => Err(RuntimeError::attribute_error(other.type_name(), name)),
    }
}

pub(crate) fn set_attribute(target: &Value, name: &str, value: Value) -> RuntimeResult<()> {
    match target {
        Value::Object(obj) => {
            obj.set(name, value);
            Ok(())
        }
        other => Err(RuntimeError::attribute_error(other.type_name(), name)),
    }
}

/// 把索引归一化到 `0..len`，负数从末尾计
fn normalize_index(kind: &str, index: &Value, len: usize) -> RuntimeResult<usize> {
    let n = match index.as_number() {
        Some(Number::Int(n)) => n,
        _ => {
            return Err(RuntimeError::type_error(format!(
                "{} indices must be integers, not {}",
                kind,
                index.type_name()
            )))
        }
    };
    let resolved = if n < 0 { n + len as i64 } else { n };
    if resolved < 0 || resolved >= len as i64 {
        return Err(RuntimeError::index_error(format!("{} index out of range", kind)));
    }
    Ok(resolved as usize)
}

pub(crate) fn get_item(value: &Value, index: &Value) -> RuntimeResult<Value> {
    match value {
        Value::List(items) => {
            let items = items.borrow();
            let i = normalize_index("list", index, items.len())?;
            Ok(items[i].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let i = normalize_index("string", index, chars.len())?;
            Ok(Value::str(chars[i].to_string()))
        }
        Value::Dict(dict) => dict
            .borrow()
            .get(index)?
            .ok_or_else(|| RuntimeError::key_error(index.repr())),
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

pub(crate) fn set_item(target: &Value, index: &Value, value: Value) -> RuntimeResult<()> {
    match target {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let i = normalize_index("list assignment", index, items.len())?;
            items[i] = value;
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(index.clone(), value),
        other => Err(RuntimeError::type_error(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

pub(crate) fn call(callee: &Value, args: &[Value]) -> RuntimeResult<Value> {
    match callee {
        Value::Function(func) => {
            log::trace!("calling {} with {} args", func.name, args.len());
            func.call(args)
        }
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not callable",
            other.type_name()
        ))),
    }
}
