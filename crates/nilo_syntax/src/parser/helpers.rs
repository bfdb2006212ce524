//! Parser Helper Functions

use super::ParserError;
use crate::ast::{Expr, Span};
use crate::lexer::Token;
use chumsky::prelude::*;
use nilo_diagnostics::SpanExt;

/// 解析标识符
pub fn ident_parser() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::Ident(ident) => ident }
}

/// 覆盖两个子表达式的 span
pub fn span_of(lhs: &Expr, rhs: &Expr) -> Span {
    lhs.span.join(&rhs.span)
}
