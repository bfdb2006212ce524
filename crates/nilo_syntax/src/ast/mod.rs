pub mod display;
pub mod expr;
pub mod stmt;

// 重新导出核心类型，方便外部直接使用 nilo_syntax::ast::Expr 等
pub use expr::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, Literal, Span, UnaryOp};
pub use stmt::{AssignOp, AssignTarget, Stmt};

/// 整个程序：按顺序执行的语句列表
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
