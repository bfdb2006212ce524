use super::super::helpers::span_of;
use super::ParserError;
use crate::ast::*;
use crate::lexer::Token;
use chumsky::prelude::*;

pub fn parser<'a>(
    factor: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Expr, Error = ParserError> + Clone + 'a {
    // Term: *, /, //, %
    let term = factor
        .clone()
        .then(
            just(Token::Star)
                .to(BinaryOp::Mul)
                .or(just(Token::Slash).to(BinaryOp::Div))
                .or(just(Token::DoubleSlash).to(BinaryOp::FloorDiv))
                .or(just(Token::Percent).to(BinaryOp::Mod))
                .then(factor)
                .repeated(),
        )
        .foldl(|lhs, (op, rhs)| {
            let span = span_of(&lhs, &rhs);
            Expr::new(ExprKind::Binary(Box::new(lhs), op, Box::new(rhs)), span)
        })
        .boxed();

    // Arith: +, -
    let arith = term
        .clone()
        .then(
            just(Token::Plus)
                .to(BinaryOp::Add)
                .or(just(Token::Minus).to(BinaryOp::Sub))
                .then(term)
                .repeated(),
        )
        .foldl(|lhs, (op, rhs)| {
            let span = span_of(&lhs, &rhs);
            Expr::new(ExprKind::Binary(Box::new(lhs), op, Box::new(rhs)), span)
        })
        .boxed();

    // Comparison: ==, !=, <, >, <=, >=, is, is not (左结合，不做链式比较)
    let is_op = just(Token::Is)
        .ignore_then(just(Token::Not).or_not())
        .map(|not| if not.is_some() { CompareOp::IsNot } else { CompareOp::Is });

    let comparison = arith
        .clone()
        .then(
            just(Token::EqEq)
                .to(CompareOp::Eq)
                .or(just(Token::NotEq).to(CompareOp::Neq))
                .or(just(Token::Leq).to(CompareOp::Leq))
                .or(just(Token::Geq).to(CompareOp::Geq))
                .or(just(Token::Lt).to(CompareOp::Lt))
                .or(just(Token::Gt).to(CompareOp::Gt))
                .or(is_op)
                .then(arith)
                .repeated(),
        )
        .foldl(|lhs, (op, rhs)| {
            let span = span_of(&lhs, &rhs);
            Expr::new(ExprKind::Compare(Box::new(lhs), op, Box::new(rhs)), span)
        })
        .boxed();

    // Not: not x
    let not_test = just(Token::Not)
        .map_with_span(|_, span: Span| span)
        .repeated()
        .then(comparison)
        .foldr(|span, operand| {
            let span = span.start..operand.span.end;
            Expr::new(ExprKind::Unary(UnaryOp::Not, Box::new(operand)), span)
        })
        .boxed();

    // Logical And
    let and_test = not_test
        .clone()
        .then(just(Token::And).to(BoolOp::And).then(not_test).repeated())
        .foldl(|lhs, (op, rhs)| {
            let span = span_of(&lhs, &rhs);
            Expr::new(ExprKind::BoolOp(Box::new(lhs), op, Box::new(rhs)), span)
        })
        .boxed();

    // Logical Or
    and_test
        .clone()
        .then(just(Token::Or).to(BoolOp::Or).then(and_test).repeated())
        .foldl(|lhs, (op, rhs)| {
            let span = span_of(&lhs, &rhs);
            Expr::new(ExprKind::BoolOp(Box::new(lhs), op, Box::new(rhs)), span)
        })
        .boxed()
}
