//! Value - 运行时值
//!
//! 列表、字典、对象是共享的可变引用 (`Rc<RefCell<..>>`)；
//! 身份比较 ([`Value::is_identical`]) 对它们比较指针，对标量比较值。

use crate::error::{RuntimeError, RuntimeResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// 原生函数签名
pub type NativeFn = dyn Fn(&[Value]) -> RuntimeResult<Value>;

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<Dict>>),
    Object(Rc<Object>),
    Function(Rc<NativeFunction>),
}

/// 属性命名空间，由 `object()` 创建
#[derive(Debug, Default)]
pub struct Object {
    attrs: RefCell<BTreeMap<String, Value>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.attrs.borrow_mut().insert(name.into(), value);
    }
}

/// 按插入顺序保存的字典；键按 `==` 比较，只接受标量键
#[derive(Debug, Default, Clone)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_key(key: &Value) -> RuntimeResult<()> {
        match key {
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => Ok(()),
            other => Err(RuntimeError::type_error(format!(
                "unhashable type: '{}'",
                other.type_name()
            ))),
        }
    }

    pub fn get(&self, key: &Value) -> RuntimeResult<Option<Value>> {
        Self::check_key(key)?;
        Ok(self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    pub fn insert(&mut self, key: Value, value: Value) -> RuntimeResult<()> {
        Self::check_key(&key)?;
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

/// 原生函数
pub struct NativeFunction {
    pub name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn call(&self, args: &[Value]) -> RuntimeResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl Value {
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn object() -> Self {
        Value::Object(Rc::new(Object::new()))
    }

    pub fn function(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        Value::Function(Rc::new(NativeFunction::new(name, func)))
    }

    /// 类型名，用于错误信息
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// 真值
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// 身份比较 (`is`)
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// 数值视图；bool 按 int 处理
    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(*b as i64)),
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    /// Python 风格的 repr：字符串带引号
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, &mut Vec::new(), true);
        out
    }

    fn container_ptr(&self) -> Option<*const ()> {
        match self {
            Value::List(items) => Some(Rc::as_ptr(items) as *const ()),
            Value::Dict(dict) => Some(Rc::as_ptr(dict) as *const ()),
            _ => None,
        }
    }

    /// `seen` 记录正在渲染的容器；重入时输出 `[...]` / `{...}`
    fn render(&self, out: &mut String, seen: &mut Vec<*const ()>, quoted: bool) {
        if let Some(ptr) = self.container_ptr() {
            if seen.contains(&ptr) {
                out.push_str(if matches!(self, Value::List(_)) { "[...]" } else { "{...}" });
                return;
            }
            seen.push(ptr);
        }
        match self {
            Value::None => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Float(x) => out.push_str(&format!("{:?}", x)),
            Value::Str(s) if quoted => push_quoted(out, s),
            Value::Str(s) => out.push_str(s),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render(out, seen, true);
                }
                out.push(']');
            }
            Value::Dict(dict) => {
                out.push('{');
                for (i, (k, v)) in dict.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    k.render(out, seen, true);
                    out.push_str(": ");
                    v.render(out, seen, true);
                }
                out.push('}');
            }
            Value::Object(obj) => {
                out.push_str(&format!("<object with {} attributes>", obj.attrs.borrow().len()))
            }
            Value::Function(func) => out.push_str(&format!("<function {}>", func.name)),
        }
        if self.container_ptr().is_some() {
            seen.pop();
        }
    }

    /// 结构比较；`seen` 中的容器对视为相等，自引用容器不会无限递归
    fn eq_in(&self, other: &Value, seen: &mut Vec<(*const (), *const ())>) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return match (a, b) {
                (Number::Int(x), Number::Int(y)) => x == y,
                (a, b) => a.to_f64() == b.to_f64(),
            };
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let pair = (Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ());
                if Rc::ptr_eq(a, b) || seen.contains(&pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    return false;
                }
                seen.push(pair);
                let equal = a.iter().zip(b.iter()).all(|(x, y)| x.eq_in(y, seen));
                seen.pop();
                equal
            }
            (Value::Dict(a), Value::Dict(b)) => {
                let pair = (Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ());
                if Rc::ptr_eq(a, b) || seen.contains(&pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                if a.len() != b.len() {
                    return false;
                }
                seen.push(pair);
                let equal = a
                    .iter()
                    .all(|(k, v)| matches!(b.get(k), Ok(Some(other)) if v.eq_in(&other, seen)));
                seen.pop();
                equal
            }
            _ => self.is_identical(other),
        }
    }
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

/// 结构相等 (`==`)：数值跨类型比较，容器逐元素比较，对象和函数比较身份
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.eq_in(other, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

/// `str()` 形式：字符串不带引号，容器内部使用 repr
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, &mut Vec::new(), false);
        f.write_str(&out)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_vs_equality() {
        let a = Value::str("x");
        let b = Value::str("x");
        assert_eq!(a, b);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&a.clone()));

        assert!(Value::None.is_identical(&Value::None));
        assert!(!Value::None.is_identical(&Value::Int(0)));
        assert!(!Value::None.is_identical(&Value::str("")));
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::str("1"));
        assert_ne!(Value::None, Value::Bool(false));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::str("").truthy());
        assert!(!Value::list(vec![]).truthy());
        assert!(Value::object().truthy());
        assert!(Value::Float(0.5).truthy());
    }

    #[test]
    fn test_display_and_repr() {
        let list = Value::list(vec![Value::Int(1), Value::str("a'b"), Value::None]);
        assert_eq!(list.to_string(), "[1, 'a\\'b', None]");
        assert_eq!(Value::Float(8.0).to_string(), "8.0");
        assert_eq!(Value::str("hi").to_string(), "hi");
        assert_eq!(Value::str("hi").repr(), "'hi'");
    }

    #[test]
    fn test_self_referential_containers() {
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &list {
            items.borrow_mut()[0] = list.clone();
        }
        assert_eq!(list.to_string(), "[[...]]");
        assert_eq!(list.repr(), "[[...]]");
        assert_eq!(list, list.clone());

        let other = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &other {
            items.borrow_mut()[0] = other.clone();
        }
        assert_eq!(list, other);

        let mut dict = Dict::new();
        dict.insert(Value::str("k"), Value::None).unwrap();
        let dict = Value::Dict(Rc::new(RefCell::new(dict)));
        if let Value::Dict(d) = &dict {
            d.borrow_mut().insert(Value::str("k"), dict.clone()).unwrap();
        }
        assert_eq!(dict.to_string(), "{'k': {...}}");
    }

    #[test]
    fn test_dict_keys() {
        let mut dict = Dict::new();
        dict.insert(Value::str("a"), Value::Int(1)).unwrap();
        dict.insert(Value::Int(1), Value::Int(2)).unwrap();
        // 1.0 与 1 是同一个键
        dict.insert(Value::Float(1.0), Value::Int(3)).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&Value::Int(1)).unwrap(), Some(Value::Int(3)));
        assert_eq!(dict.get(&Value::str("b")).unwrap(), None);

        let err = dict.insert(Value::list(vec![]), Value::None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: unhashable type: 'list'");
    }

    #[test]
    fn test_object_attrs() {
        let obj = Object::new();
        obj.set("b", Value::Int(1));
        assert_eq!(obj.get("b"), Some(Value::Int(1)));
        assert_eq!(obj.get("c"), None);
    }
}
