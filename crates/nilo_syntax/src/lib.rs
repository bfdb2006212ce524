//! Nilo Syntax
//!
//! 词法分析 (logos) + 语法分析 (chumsky)，产出 [`ast::Program`] / [`ast::Expr`]。
//! 在一个类 Python 的表达式语法上增加了 `??`、`??=`、`?.`、`?[` 四种 None 相关语法。

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lint;
pub mod parser;

pub use error::{SyntaxError, SyntaxErrorKind};

use ast::{Expr, Program};

/// 解析完整源码
pub fn parse_program(source: &str) -> Result<Program, Vec<SyntaxError>> {
    let tokens = lexer::tokenize(source).map_err(|e| vec![e])?;
    let program = parser::parse_program_tokens(tokens, source.len())?;
    log::debug!("parsed {} statements", program.stmts.len());
    Ok(program)
}

/// 解析单个表达式，换行被忽略
pub fn parse_expression(source: &str) -> Result<Expr, Vec<SyntaxError>> {
    let tokens = lexer::tokenize(source).map_err(|e| vec![e])?;
    parser::parse_expression_tokens(tokens, source.len())
}
