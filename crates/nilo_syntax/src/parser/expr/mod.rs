//! Expression Parser
//!
//! 表达式解析：原子、后缀链、幂、合并、一元、算术、比较、布尔

use crate::ast::*;
use crate::lexer::Token;
use chumsky::prelude::*;

mod atom;
mod binary;
pub mod coalesce;
pub mod postfix;

use super::ParserError;

/// 解析表达式 (公共接口)
pub fn expr_parser() -> impl Parser<Token, Expr, Error = ParserError> + Clone {
    recursive(|expr| {
        let atom = atom::parser(expr.clone()).boxed();
        let primary = postfix::primary_parser(atom, expr.clone()).boxed();
        let factor = coalesce::factor_parser(primary).boxed();
        binary::parser(factor).boxed()
    })
}
