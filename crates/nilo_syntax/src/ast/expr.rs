// 源码中的字节范围，与诊断系统共用
pub use nilo_diagnostics::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // 字面量: 1, 2.5, "hi", True, None
    Literal(Literal),

    // 变量使用: x, count
    Variable(String),

    // 括号: (a?.b ?? c)
    // 保留在 AST 中，因为它是后缀链的边界：括号外的访问重新开始求值
    Paren(Box<Expr>),

    // 列表字面量: [1, 2, 3]
    List(Vec<Expr>),

    // 字典字面量: {"k": v}
    Dict(Vec<(Expr, Expr)>),

    // 成员访问: user.name / user?.name
    Attribute {
        object: Box<Expr>,
        name: String,
        short_circuiting: bool,
    },

    // 索引: items[0] / items?[0]
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        short_circuiting: bool,
    },

    // 函数调用: f(a, b)，没有短路形式
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // 合并: left ?? right，right 只在 left 为 None 时求值
    Coalesce {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // 幂: base ** exponent (右结合)
    Power {
        base: Box<Expr>,
        exponent: Box<Expr>,
    },

    // 一元操作: -a, +a, not a
    Unary(UnaryOp, Box<Expr>),

    // 算术: a + b, a // b
    Binary(Box<Expr>, BinaryOp, Box<Expr>),

    // 比较: a == b, a is not b
    Compare(Box<Expr>, CompareOp, Box<Expr>),

    // 布尔: a and b, a or b (短路)
    BoolOp(Box<Expr>, BoolOp, Box<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 是否是后缀访问节点（属于某条访问链）
    pub fn is_trailer(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Attribute { .. } | ExprKind::Index { .. } | ExprKind::Call { .. }
        )
    }

    /// 用于错误信息的节点描述
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Variable(_) => "name",
            ExprKind::Paren(inner) => inner.describe(),
            ExprKind::List(_) => "list display",
            ExprKind::Dict(_) => "dict display",
            ExprKind::Attribute { .. } => "attribute",
            ExprKind::Index { .. } => "subscript",
            ExprKind::Call { .. } => "function call",
            ExprKind::Coalesce { .. } => "'??' expression",
            ExprKind::Power { .. }
            | ExprKind::Unary(..)
            | ExprKind::Binary(..)
            | ExprKind::Compare(..) => "expression",
            ExprKind::BoolOp(..) => "boolean expression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    Is,
    IsNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -x
    Pos, // +x
    Not, // not x
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
        }
    }
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Leq => "<=",
            CompareOp::Geq => ">=",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
        }
    }
}

impl BoolOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "not ",
        }
    }
}
