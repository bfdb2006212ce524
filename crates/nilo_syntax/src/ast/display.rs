//! AST 打印
//!
//! 输出完全加括号的形式，例如 `a ?? 2 ** b ?? 3` 打印为
//! `(a ?? (2 ** (b ?? 3)))`，方便检查优先级。源码中的括号保留为一层括号。

use super::expr::{Expr, ExprKind, Literal};
use super::stmt::{AssignTarget, Stmt};
use super::Program;
use std::fmt;

fn is_compound(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Coalesce { .. }
            | ExprKind::Power { .. }
            | ExprKind::Unary(..)
            | ExprKind::Binary(..)
            | ExprKind::Compare(..)
            | ExprKind::BoolOp(..)
    )
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::None => write!(f, "None"),
            Literal::Str(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    match c {
                        '\'' => write!(f, "\\'")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "'")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{}", lit),
            ExprKind::Variable(name) => write!(f, "{}", name),
            ExprKind::Paren(inner) if is_compound(inner) => write!(f, "{}", inner),
            ExprKind::Paren(inner) => write!(f, "({})", inner),
            ExprKind::List(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            ExprKind::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            ExprKind::Attribute {
                object,
                name,
                short_circuiting,
            } => {
                let dot = if *short_circuiting { "?." } else { "." };
                write!(f, "{}{}{}", object, dot, name)
            }
            ExprKind::Index {
                object,
                index,
                short_circuiting,
            } => {
                let open = if *short_circuiting { "?[" } else { "[" };
                write!(f, "{}{}{}]", object, open, index)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExprKind::Coalesce { left, right } => write!(f, "({} ?? {})", left, right),
            ExprKind::Power { base, exponent } => write!(f, "({} ** {})", base, exponent),
            ExprKind::Unary(op, operand) => write!(f, "({}{})", op.symbol(), operand),
            ExprKind::Binary(lhs, op, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            ExprKind::Compare(lhs, op, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            ExprKind::BoolOp(lhs, op, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Name { name, .. } => write!(f, "{}", name),
            AssignTarget::Attribute { object, name, .. } => write!(f, "{}.{}", object, name),
            AssignTarget::Index { object, index, .. } => write!(f, "{}[{}]", object, index),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "{}", expr),
            Stmt::Assign { target, value, .. } => write!(f, "{} = {}", target, value),
            Stmt::AugAssign {
                target, op, value, ..
            } => write!(f, "{} {} {}", target, op.symbol(), value),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            writeln!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
