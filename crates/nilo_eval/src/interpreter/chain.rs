//! 后缀访问链的求值
//!
//! `a?.b(c).d?[e]` 在 AST 中是嵌套的 Attribute / Index / Call 节点。
//! 求值时先把嵌套展开成 基值 + 有序的访问步骤，再从左到右执行：
//!
//! - `Active`：正常执行每一步
//! - `Suppressed`：某个 `?.` / `?[` 遇到了 None，剩余步骤全部跳过，
//!   它们的下标、参数表达式都不会被求值，整条链的结果是 None
//! - `Done`：链执行完毕
//!
//! 括号 (`ExprKind::Paren`) 不是访问节点，所以天然是链的边界：
//! `(a?.b).c` 中 `.c` 属于外层的新链，不受内层短路影响。

use super::access;
use super::Interpreter;
use crate::error::RuntimeResult;
use crate::value::Value;
use nilo_syntax::ast::{Expr, ExprKind, Span};
use std::fmt;

/// 链上的一步
enum Step<'a> {
    Attribute {
        name: &'a str,
        short_circuiting: bool,
        span: &'a Span,
    },
    Index {
        index: &'a Expr,
        short_circuiting: bool,
        span: &'a Span,
    },
    Call {
        args: &'a [Expr],
        span: &'a Span,
    },
}

impl Step<'_> {
    fn short_circuiting(&self) -> bool {
        match self {
            Step::Attribute {
                short_circuiting, ..
            }
            | Step::Index {
                short_circuiting, ..
            } => *short_circuiting,
            Step::Call { .. } => false,
        }
    }
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = if self.short_circuiting() { "?" } else { "" };
        match self {
            Step::Attribute { name, .. } => write!(f, "{}.{}", q, name),
            Step::Index { .. } => write!(f, "{}[..]", q),
            Step::Call { .. } => write!(f, "(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    Active,
    Suppressed,
    Done,
}

/// 从最外层访问节点向内展开，返回基值节点和按执行顺序排列的步骤
fn unwind(expr: &Expr) -> (&Expr, Vec<Step<'_>>) {
    let mut steps = Vec::new();
    let mut node = expr;
    loop {
        match &node.kind {
            ExprKind::Attribute {
                object,
                name,
                short_circuiting,
            } => {
                steps.push(Step::Attribute {
                    name,
                    short_circuiting: *short_circuiting,
                    span: &node.span,
                });
                node = &**object;
            }
            ExprKind::Index {
                object,
                index,
                short_circuiting,
            } => {
                steps.push(Step::Index {
                    index,
                    short_circuiting: *short_circuiting,
                    span: &node.span,
                });
                node = &**object;
            }
            ExprKind::Call { callee, args } => {
                steps.push(Step::Call {
                    args,
                    span: &node.span,
                });
                node = &**callee;
            }
            _ => break,
        }
    }
    steps.reverse();
    (node, steps)
}

/// 链的执行结果，赋值目标需要区分“短路”和“值恰好是 None”
pub(super) enum Chained {
    Complete(Value),
    Suppressed,
}

impl Interpreter {
    /// 求值一个以访问节点为根的表达式
    pub(super) fn eval_chain(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match self.run_chain(expr)? {
            Chained::Complete(value) => Ok(value),
            Chained::Suppressed => Ok(self.marker().clone()),
        }
    }

    /// 求值赋值目标的对象部分；非访问节点按普通表达式求值
    pub(super) fn eval_target_object(&mut self, expr: &Expr) -> RuntimeResult<Chained> {
        match &expr.kind {
            ExprKind::Attribute { .. } | ExprKind::Index { .. } | ExprKind::Call { .. } => {
                self.run_chain(expr)
            }
            _ => self.eval(expr).map(Chained::Complete),
        }
    }

    fn run_chain(&mut self, expr: &Expr) -> RuntimeResult<Chained> {
        let (base, steps) = unwind(expr);
        let mut value = self.eval(base)?;
        let mut state = ChainState::Active;

        for step in &steps {
            if state == ChainState::Suppressed {
                log::trace!("skipping '{}' in suppressed chain", step);
                continue;
            }
            if step.short_circuiting() && self.is_absent(&value) {
                log::trace!("'{}' saw None, suppressing rest of chain", step);
                state = ChainState::Suppressed;
                continue;
            }
            value = self.apply_step(step, value)?;
            if step.short_circuiting() && self.is_absent(&value) {
                log::trace!("'{}' produced None, suppressing rest of chain", step);
                state = ChainState::Suppressed;
            }
        }

        if state == ChainState::Suppressed {
            return Ok(Chained::Suppressed);
        }
        state = ChainState::Done;
        log::trace!("chain at {:?} reached {:?}", expr.span, state);
        Ok(Chained::Complete(value))
    }

    /// 执行一步；下标和参数此时才求值
    fn apply_step(&mut self, step: &Step<'_>, value: Value) -> RuntimeResult<Value> {
        match step {
            Step::Attribute { name, span, .. } => {
                access::get_attribute(&value, name).map_err(|e| e.at(span))
            }
            Step::Index { index, span, .. } => {
                let key = self.eval(index)?;
                access::get_item(&value, &key).map_err(|e| e.at(span))
            }
            Step::Call { args, span } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                access::call(&value, &args).map_err(|e| e.at(span))
            }
        }
    }
}
