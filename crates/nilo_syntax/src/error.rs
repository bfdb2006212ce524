//! Syntax Errors
//!
//! 解析阶段的错误：未知 token、意外的 token、未闭合的括号、非法的赋值目标。
//! 这些错误在解析时立即报告，不做恢复。

use crate::ast::Span;
use crate::lexer::Token;
use chumsky::error::{Simple, SimpleReason};
use nilo_diagnostics::Diagnostic;
use thiserror::Error;

/// 错误种类
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxErrorKind {
    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("integer literal too large: {0}")]
    IntegerTooLarge(String),

    #[error("unexpected {}{}", describe_found(.found), describe_expected(.expected))]
    Unexpected {
        found: Option<String>,
        expected: Vec<String>,
    },

    #[error("unclosed delimiter {0}")]
    Unclosed(String),

    /// 赋值目标以 `?.` / `?[` 结尾
    #[error("cannot assign to a short-circuiting access ending in '{0}'")]
    ShortCircuitTarget(&'static str),

    #[error("cannot assign to {0}")]
    InvalidTarget(String),

    /// 其余由 chumsky `Simple::custom` 产生的错误
    #[error("{0}")]
    Custom(String),
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(tok) => tok.clone(),
        None => "end of input".to_string(),
    }
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(", expected {}", one),
        many => format!(", expected one of {}", many.join(", ")),
    }
}

/// 语法错误
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn unknown_token(text: &str, span: Span) -> Self {
        Self::new(SyntaxErrorKind::UnknownToken(text.to_string()), span)
    }

    /// 转换为统一诊断
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(format!("syntax error: {}", self.kind)).span(self.span.clone());
        match &self.kind {
            SyntaxErrorKind::ShortCircuitTarget(op) => diag
                .label(format!("'{}' cannot be the last access of an assignment target", op))
                .with_note("short-circuiting accesses may be used earlier in the target, e.g. a?.b.c = 1")
                .suggest(format!("replace the final '{}' with a plain access", op)),
            SyntaxErrorKind::InvalidTarget(_) => {
                diag.label("not a name, attribute or subscript")
            }
            SyntaxErrorKind::Unclosed(_) => diag.label("opened here"),
            _ => diag.label("here"),
        }
    }
}

/// chumsky 的错误不保留我们自己的种类，只能通过消息文本区分
impl From<Simple<Token>> for SyntaxError {
    fn from(err: Simple<Token>) -> Self {
        let kind = match err.reason() {
            SimpleReason::Custom(msg) => SyntaxErrorKind::Custom(msg.clone()),
            SimpleReason::Unclosed { delimiter, .. } => SyntaxErrorKind::Unclosed(delimiter.to_string()),
            SimpleReason::Unexpected => {
                let mut expected: Vec<String> = err
                    .expected()
                    .map(|tok| match tok {
                        Some(tok) => tok.to_string(),
                        None => "end of input".to_string(),
                    })
                    .collect();
                expected.sort();
                expected.dedup();
                SyntaxErrorKind::Unexpected {
                    found: err.found().map(|tok| tok.to_string()),
                    expected,
                }
            }
        };
        let span = match err.reason() {
            SimpleReason::Unclosed { span, .. } => span.clone(),
            _ => err.span(),
        };
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_message() {
        let err = SyntaxError::new(
            SyntaxErrorKind::Unexpected {
                found: None,
                expected: vec!["'('".into(), "identifier".into()],
            },
            3..3,
        );
        assert_eq!(
            err.to_string(),
            "unexpected end of input, expected one of '(', identifier"
        );
    }

    #[test]
    fn test_short_circuit_target_diagnostic() {
        let err = SyntaxError::new(SyntaxErrorKind::ShortCircuitTarget("?."), 0..4);
        let diag = err.to_diagnostic();
        assert_eq!(
            diag.message,
            "syntax error: cannot assign to a short-circuiting access ending in '?.'"
        );
        assert_eq!(diag.span, Some(0..4));
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_from_simple_custom() {
        let simple: Simple<Token> = Simple::custom(2..5, "bad float");
        let err = SyntaxError::from(simple);
        assert_eq!(err.kind, SyntaxErrorKind::Custom("bad float".into()));
        assert_eq!(err.span, 2..5);
    }
}
