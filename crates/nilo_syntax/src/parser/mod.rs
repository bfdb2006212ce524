//! Parser Module
//!
//! 基于 chumsky 的递归下降解析器。表达式部分按优先级分层：
//! `atom -> primary (trailers) -> power -> coalesce -> factor -> term -> arith
//! -> comparison -> not -> and -> or`。

pub mod expr;
pub mod helpers;
pub mod stmt;
pub mod target;

use crate::ast::{Expr, Program, Span};
use crate::error::SyntaxError;
use crate::lexer::Token;
use chumsky::prelude::*;
use chumsky::Stream;

pub type ParserError = Simple<Token>;

/// 主入口：解析整个程序
///
/// 语句之间用换行或 `;` 分隔；赋值目标在 chumsky 解析完成后校验，
/// 这样非法目标可以报告为具体的错误种类。
pub fn parse_program_tokens(
    tokens: Vec<(Token, Span)>,
    source_len: usize,
) -> Result<Program, Vec<SyntaxError>> {
    let eoi = source_len..source_len;
    let raw = stmt::program_parser()
        .parse(Stream::from_iter(eoi, tokens.into_iter()))
        .map_err(|errs| errs.into_iter().map(SyntaxError::from).collect::<Vec<_>>())?;

    let mut stmts = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();
    for raw_stmt in raw {
        match stmt::lower(raw_stmt) {
            Ok(stmt) => stmts.push(stmt),
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(Program { stmts })
    } else {
        Err(errors)
    }
}

/// 解析单个表达式（不允许语句分隔符）
pub fn parse_expression_tokens(
    tokens: Vec<(Token, Span)>,
    source_len: usize,
) -> Result<Expr, Vec<SyntaxError>> {
    let eoi = source_len..source_len;
    let tokens = tokens.into_iter().filter(|(tok, _)| *tok != Token::Newline);
    expr::expr_parser()
        .then_ignore(end())
        .parse(Stream::from_iter(eoi, tokens))
        .map_err(|errs| errs.into_iter().map(SyntaxError::from).collect())
}
