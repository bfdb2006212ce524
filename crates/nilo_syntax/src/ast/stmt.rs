use crate::ast::expr::{BinaryOp, Expr, Span};

/// 语句
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    // 表达式语句: print(x)
    Expression(Expr),

    // 赋值: x = 1, user.name = "a", items[0] = 2
    Assign {
        span: Span,
        target: AssignTarget,
        value: Expr,
    },

    // 增量赋值: x += 1, x ??= "default"
    AugAssign {
        span: Span,
        target: AssignTarget,
        op: AssignOp,
        value: Expr,
    },
}

/// 已校验的赋值目标
///
/// 最外层访问不能是 `?.` / `?[`；`object` 内部的访问链不受限制。
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Name {
        name: String,
        span: Span,
    },
    Attribute {
        object: Expr,
        name: String,
        span: Span,
    },
    Index {
        object: Expr,
        index: Expr,
        span: Span,
    },
}

impl AssignTarget {
    pub fn span(&self) -> &Span {
        match self {
            AssignTarget::Name { span, .. }
            | AssignTarget::Attribute { span, .. }
            | AssignTarget::Index { span, .. } => span,
        }
    }
}

/// 增量赋值运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `+=` `-=` `*=` `/=` `//=` `%=`
    Arith(BinaryOp),
    /// `**=`
    Pow,
    /// `??=`，只在目标当前为 None 时求值右侧
    Coalesce,
}

impl AssignOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Arith(BinaryOp::Add) => "+=",
            AssignOp::Arith(BinaryOp::Sub) => "-=",
            AssignOp::Arith(BinaryOp::Mul) => "*=",
            AssignOp::Arith(BinaryOp::Div) => "/=",
            AssignOp::Arith(BinaryOp::FloorDiv) => "//=",
            AssignOp::Arith(BinaryOp::Mod) => "%=",
            AssignOp::Pow => "**=",
            AssignOp::Coalesce => "??=",
        }
    }
}
