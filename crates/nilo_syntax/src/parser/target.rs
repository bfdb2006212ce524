//! 赋值目标校验
//!
//! 目标必须是名字、属性访问或索引。最外层的访问不能是 `?.` / `?[`，
//! 因为短路后没有可以写入的位置；更内层的短路访问只影响取 object 的过程。

use crate::ast::{AssignTarget, Expr, ExprKind};
use crate::error::{SyntaxError, SyntaxErrorKind};

pub fn assign_target(expr: Expr) -> Result<AssignTarget, SyntaxError> {
    let span = expr.span.clone();
    match expr.kind {
        ExprKind::Variable(name) => Ok(AssignTarget::Name { name, span }),
        ExprKind::Attribute {
            short_circuiting: true,
            ..
        } => Err(SyntaxError::new(
            SyntaxErrorKind::ShortCircuitTarget("?."),
            span,
        )),
        ExprKind::Index {
            short_circuiting: true,
            ..
        } => Err(SyntaxError::new(
            SyntaxErrorKind::ShortCircuitTarget("?["),
            span,
        )),
        ExprKind::Attribute { object, name, .. } => Ok(AssignTarget::Attribute {
            object: *object,
            name,
            span,
        }),
        ExprKind::Index { object, index, .. } => Ok(AssignTarget::Index {
            object: *object,
            index: *index,
            span,
        }),
        // (a) = 1 与 a = 1 相同
        ExprKind::Paren(inner) => assign_target(*inner),
        kind => {
            let what = Expr::new(kind, span.clone()).describe();
            Err(SyntaxError::new(
                SyntaxErrorKind::InvalidTarget(what.to_string()),
                span,
            ))
        }
    }
}
