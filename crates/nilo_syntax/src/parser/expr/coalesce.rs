//! factor / coalesce / power
//!
//! ```text
//! factor   := ('+' | '-') factor | coalesce
//! coalesce := power ['??' factor]
//! power    := primary ['**' factor]
//! ```
//!
//! `??` 插在 `factor` 和 `power` 之间：比 `**` 松，比 `*` `+` 比较和布尔都紧。
//! 两个运算符的右侧都是 `factor`，所以 `a ?? b ?? c` 解析为 `a ?? (b ?? c)`，
//! `a ?? 2 ** b ?? 3` 解析为 `a ?? (2 ** (b ?? 3))`。

use super::super::helpers::span_of;
use super::ParserError;
use crate::ast::*;
use crate::lexer::Token;
use chumsky::prelude::*;

pub fn factor_parser<'a>(
    primary: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Expr, Error = ParserError> + Clone + 'a {
    recursive(|factor| {
        let power = primary
            .then(just(Token::DoubleStar).ignore_then(factor.clone()).or_not())
            .map(|(base, exponent)| match exponent {
                Some(exponent) => {
                    let span = span_of(&base, &exponent);
                    Expr::new(
                        ExprKind::Power {
                            base: Box::new(base),
                            exponent: Box::new(exponent),
                        },
                        span,
                    )
                }
                None => base,
            });

        let coalesce = power
            .then(just(Token::QuestionQuestion).ignore_then(factor.clone()).or_not())
            .map(|(left, right)| match right {
                Some(right) => {
                    let span = span_of(&left, &right);
                    Expr::new(
                        ExprKind::Coalesce {
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                        span,
                    )
                }
                None => left,
            });

        just(Token::Minus)
            .to(UnaryOp::Neg)
            .or(just(Token::Plus).to(UnaryOp::Pos))
            .map_with_span(|op, span| (op, span))
            .then(factor)
            .map(|((op, span), operand)| {
                let span = span.start..operand.span.end;
                Expr::new(ExprKind::Unary(op, Box::new(operand)), span)
            })
            .or(coalesce)
    })
}
