//! Lint - None 相关运算符的静态检查
//!
//! 找出永远不会生效的 `??` / `?.` / `?[`：
//!
//! - `1 ?? x`：左侧永远不是 None，`x` 永远不会求值
//! - `[1]?[0]`：对永远不是 None 的值做短路访问
//! - `None?.x`：结果恒为 None
//!
//! 判断基于默认的 None 标记；只产出警告，不影响执行。

use crate::ast::*;
use nilo_diagnostics::{Diagnostic, Suggestion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintKind {
    /// `??` 的右侧不可达
    UnreachableFallback,
    /// `?.` / `?[` 作用在永远不是 None 的值上
    NeedlessShortCircuit(&'static str),
    /// `?.` / `?[` 作用在 None 字面量上
    AlwaysNone(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lint {
    pub kind: LintKind,
    pub span: Span,
}

impl Lint {
    pub fn message(&self) -> String {
        match &self.kind {
            LintKind::UnreachableFallback => {
                "left operand of '??' is never None, so the fallback is never evaluated".into()
            }
            LintKind::NeedlessShortCircuit(op) => {
                format!("'{}' is applied to a value that is never None", op)
            }
            LintKind::AlwaysNone(op) => format!("'{}' applied to None always produces None", op),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.message()).span(self.span.clone());
        match &self.kind {
            LintKind::UnreachableFallback => diag.label("never evaluated"),
            LintKind::NeedlessShortCircuit(op) => diag
                .label("this access cannot short-circuit")
                .with_suggestion(
                    Suggestion::new("drop the '?'").with_replacement(op[1..].to_string()),
                ),
            LintKind::AlwaysNone(_) => diag.label("always None"),
        }
    }
}

/// 值是否一定不是 None
fn never_none(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(Literal::None) => false,
        ExprKind::Literal(_) | ExprKind::List(_) | ExprKind::Dict(_) => true,
        ExprKind::Paren(inner) => never_none(inner),
        ExprKind::Coalesce { right, .. } => never_none(right),
        ExprKind::Power { .. }
        | ExprKind::Unary(..)
        | ExprKind::Binary(..)
        | ExprKind::Compare(..) => true,
        ExprKind::BoolOp(lhs, _, rhs) => never_none(lhs) && never_none(rhs),
        ExprKind::Variable(_)
        | ExprKind::Attribute { .. }
        | ExprKind::Index { .. }
        | ExprKind::Call { .. } => false,
    }
}

fn is_none_literal(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(Literal::None) => true,
        ExprKind::Paren(inner) => is_none_literal(inner),
        _ => false,
    }
}

#[derive(Default)]
struct Linter {
    lints: Vec<Lint>,
}

impl Linter {
    fn short_circuit(&mut self, object: &Expr, op: &'static str, span: &Span) {
        let kind = if is_none_literal(object) {
            LintKind::AlwaysNone(op)
        } else if never_none(object) {
            LintKind::NeedlessShortCircuit(op)
        } else {
            return;
        };
        self.lints.push(Lint {
            kind,
            span: span.clone(),
        });
    }

    fn check_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Variable(_) => {}
            ExprKind::Paren(inner) | ExprKind::Unary(_, inner) => self.check_expr(inner),
            ExprKind::List(items) => items.iter().for_each(|item| self.check_expr(item)),
            ExprKind::Dict(entries) => {
                for (key, value) in entries {
                    self.check_expr(key);
                    self.check_expr(value);
                }
            }
            ExprKind::Attribute {
                object,
                short_circuiting,
                ..
            } => {
                if *short_circuiting {
                    self.short_circuit(object, "?.", &expr.span);
                }
                self.check_expr(object);
            }
            ExprKind::Index {
                object,
                index,
                short_circuiting,
            } => {
                if *short_circuiting {
                    self.short_circuit(object, "?[", &expr.span);
                }
                self.check_expr(object);
                self.check_expr(index);
            }
            ExprKind::Call { callee, args } => {
                self.check_expr(callee);
                args.iter().for_each(|arg| self.check_expr(arg));
            }
            ExprKind::Coalesce { left, right } => {
                if never_none(left) {
                    self.lints.push(Lint {
                        kind: LintKind::UnreachableFallback,
                        span: right.span.clone(),
                    });
                }
                self.check_expr(left);
                self.check_expr(right);
            }
            ExprKind::Power {
                base: lhs,
                exponent: rhs,
            }
            | ExprKind::Binary(lhs, _, rhs)
            | ExprKind::Compare(lhs, _, rhs)
            | ExprKind::BoolOp(lhs, _, rhs) => {
                self.check_expr(lhs);
                self.check_expr(rhs);
            }
        }
    }

    fn check_target(&mut self, target: &AssignTarget) {
        match target {
            AssignTarget::Name { .. } => {}
            AssignTarget::Attribute { object, .. } => self.check_expr(object),
            AssignTarget::Index { object, index, .. } => {
                self.check_expr(object);
                self.check_expr(index);
            }
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => self.check_expr(expr),
            Stmt::Assign { target, value, .. } | Stmt::AugAssign { target, value, .. } => {
                self.check_target(target);
                self.check_expr(value);
            }
        }
    }
}

/// 检查整个程序，按出现顺序返回警告
pub fn lint_program(program: &Program) -> Vec<Lint> {
    let mut linter = Linter::default();
    for stmt in &program.stmts {
        linter.check_stmt(stmt);
    }
    linter.lints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;

    fn kinds(source: &str) -> Vec<LintKind> {
        let program = parse_program(source).expect("parse failed");
        lint_program(&program).into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_unreachable_fallback() {
        assert_eq!(kinds("1 ?? f()"), vec![LintKind::UnreachableFallback]);
        assert_eq!(kinds("(a ?? 0) ?? b"), vec![LintKind::UnreachableFallback]);
        assert!(kinds("a ?? 1").is_empty());
        assert!(kinds("None ?? 1").is_empty());
        // `a and 1` 可能返回 a
        assert!(kinds("(a and 1) ?? 2").is_empty());
    }

    #[test]
    fn test_short_circuit_lints() {
        assert_eq!(kinds("[1]?[0]"), vec![LintKind::NeedlessShortCircuit("?[")]);
        assert_eq!(kinds("None?.x"), vec![LintKind::AlwaysNone("?.")]);
        assert!(kinds("a?.b?.c").is_empty());
    }

    #[test]
    fn test_nested_and_targets() {
        assert_eq!(
            kinds("x = [1 ?? 2]\nx[0 ?? 1] ??= 'a'?.b"),
            vec![
                LintKind::UnreachableFallback,
                LintKind::UnreachableFallback,
                LintKind::NeedlessShortCircuit("?."),
            ]
        );
    }

    #[test]
    fn test_diagnostic() {
        let program = parse_program("1 ?? f()").unwrap();
        let lint = &lint_program(&program)[0];
        assert_eq!(lint.span, 5..8);
        let diag = lint.to_diagnostic();
        assert!(!diag.level.is_error());
        assert_eq!(diag.label.as_deref(), Some("never evaluated"));

        let program = parse_program("[1]?[0]").unwrap();
        let diag = lint_program(&program)[0].to_diagnostic();
        assert_eq!(diag.suggestions[0].replacement.as_deref(), Some("["));
    }
}
