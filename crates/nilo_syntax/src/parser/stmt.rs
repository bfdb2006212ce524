//! Statement Parser
//!
//! 语句只有三种：表达式、赋值、增量赋值。chumsky 阶段先产出 [`RawStmt`]，
//! 赋值目标仍是普通表达式；随后 [`lower`] 校验目标并生成最终的 [`Stmt`]。

use super::expr::expr_parser;
use super::target::assign_target;
use super::ParserError;
use crate::ast::*;
use crate::error::SyntaxError;
use crate::lexer::Token;
use chumsky::prelude::*;

/// 未校验赋值目标的语句
#[derive(Debug, Clone, PartialEq)]
pub enum RawStmt {
    Expression(Expr),
    Assign {
        span: Span,
        target: Expr,
        /// `None` 表示普通的 `=`
        op: Option<AssignOp>,
        value: Expr,
    },
}

/// 增量赋值运算符（`=` 产出 `None`）
pub fn augassign_parser() -> impl Parser<Token, Option<AssignOp>, Error = ParserError> + Clone {
    select! {
        Token::Eq => None,
        Token::PlusEq => Some(AssignOp::Arith(BinaryOp::Add)),
        Token::MinusEq => Some(AssignOp::Arith(BinaryOp::Sub)),
        Token::StarEq => Some(AssignOp::Arith(BinaryOp::Mul)),
        Token::SlashEq => Some(AssignOp::Arith(BinaryOp::Div)),
        Token::DoubleSlashEq => Some(AssignOp::Arith(BinaryOp::FloorDiv)),
        Token::PercentEq => Some(AssignOp::Arith(BinaryOp::Mod)),
        Token::DoubleStarEq => Some(AssignOp::Pow),
        Token::QuestionQuestionEq => Some(AssignOp::Coalesce),
    }
}

/// 解析单条语句
pub fn stmt_parser() -> impl Parser<Token, RawStmt, Error = ParserError> + Clone {
    expr_parser()
        .then(augassign_parser().then(expr_parser()).or_not())
        .map_with_span(|(lhs, assignment), span| match assignment {
            None => RawStmt::Expression(lhs),
            Some((op, value)) => RawStmt::Assign {
                span,
                target: lhs,
                op,
                value,
            },
        })
}

/// 整个程序：换行或 `;` 分隔的语句
pub fn program_parser() -> impl Parser<Token, Vec<RawStmt>, Error = ParserError> {
    let separator = just(Token::Newline)
        .or(just(Token::Semicolon))
        .repeated()
        .at_least(1);

    stmt_parser()
        .separated_by(separator)
        .allow_leading()
        .allow_trailing()
        .then_ignore(end())
}

/// 校验赋值目标，生成最终语句
pub fn lower(raw: RawStmt) -> Result<Stmt, SyntaxError> {
    match raw {
        RawStmt::Expression(expr) => Ok(Stmt::Expression(expr)),
        RawStmt::Assign {
            span,
            target,
            op,
            value,
        } => {
            let target = assign_target(target)?;
            Ok(match op {
                None => Stmt::Assign {
                    span,
                    target,
                    value,
                },
                Some(op) => Stmt::AugAssign {
                    span,
                    target,
                    op,
                    value,
                },
            })
        }
    }
}
