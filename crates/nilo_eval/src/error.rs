//! Runtime Errors
//!
//! 求值阶段的错误。`??`、`?.`、`?[` 自身不引入新的错误种类：
//! 对非 None 值的访问失败照常抛出，对 None 的短路访问不抛出。

use nilo_diagnostics::{Diagnostic, Span};
use thiserror::Error;

/// 运行时错误种类，消息格式与 Python 的异常一致
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("NameError: name '{0}' is not defined")]
    Name(String),

    #[error("AttributeError: '{type_name}' object has no attribute '{attr}'")]
    Attribute { type_name: String, attr: String },

    #[error("IndexError: {0}")]
    Index(String),

    #[error("KeyError: {0}")]
    Key(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("ZeroDivisionError: {0}")]
    ZeroDivision(String),

    #[error("OverflowError: {0}")]
    Overflow(String),

    #[error("RecursionError: maximum evaluation depth of {0} exceeded")]
    RecursionLimit(usize),
}

/// 运行时错误
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// 原生函数产生的错误没有位置，由调用点补上
    pub span: Option<Span>,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind) -> Self {
        Self { kind, span: None }
    }

    /// 如果还没有位置，使用 span
    pub fn at(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }

    pub fn name_error(name: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Name(name.into()))
    }

    pub fn attribute_error(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Attribute {
            type_name: type_name.into(),
            attr: attr.into(),
        })
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Index(message.into()))
    }

    pub fn key_error(key_repr: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Key(key_repr.into()))
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Type(message.into()))
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::ZeroDivision(message.into()))
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Overflow(message.into()))
    }

    /// 转换为统一诊断
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.to_string());
        if let Some(span) = &self.span {
            diag = diag.span(span.clone());
        }
        match &self.kind {
            RuntimeErrorKind::Attribute { type_name, attr } if type_name == "NoneType" => diag
                .label("this value is None")
                .suggest(format!("use '?.{}' to short-circuit when the value is None", attr)),
            RuntimeErrorKind::Type(msg) if msg.starts_with("'NoneType'") => diag
                .label("this value is None")
                .suggest("use '?[' to short-circuit, or '??' to supply a default"),
            RuntimeErrorKind::Type(msg) if msg.contains("'NoneType'") => diag
                .label("raised here")
                .suggest("use '??' to supply a default for None"),
            RuntimeErrorKind::RecursionLimit(_) => diag
                .label("raised here")
                .with_note("the limit can be raised with --max-depth"),
            _ => diag.label("raised here"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RuntimeError::attribute_error("NoneType", "b").to_string(),
            "AttributeError: 'NoneType' object has no attribute 'b'"
        );
        assert_eq!(
            RuntimeError::name_error("x").to_string(),
            "NameError: name 'x' is not defined"
        );
        assert_eq!(
            RuntimeError::new(RuntimeErrorKind::RecursionLimit(8)).to_string(),
            "RecursionError: maximum evaluation depth of 8 exceeded"
        );
    }

    #[test]
    fn test_at_keeps_first_span() {
        let err = RuntimeError::type_error("boom").at(&(1..2)).at(&(5..9));
        assert_eq!(err.span, Some(1..2));
    }

    #[test]
    fn test_none_attribute_diagnostic_has_hint() {
        let diag = RuntimeError::attribute_error("NoneType", "name")
            .at(&(0..6))
            .to_diagnostic();
        assert_eq!(diag.span, Some(0..6));
        assert_eq!(
            diag.suggestions[0].message,
            "use '?.name' to short-circuit when the value is None"
        );
    }
}
