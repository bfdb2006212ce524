use super::super::helpers::ident_parser;
use super::ParserError;
use crate::ast::*;
use crate::lexer::Token;
use chumsky::prelude::*;

/// 解析字面量值
fn literal_parser() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    let float = select! { Token::Float(s) => s }.try_map(|s, span| {
        s.parse::<f64>()
            .map(Literal::Float)
            .map_err(|e| Simple::custom(span, format!("invalid float literal '{}': {}", s, e)))
    });

    select! {
        Token::Int(x) => Literal::Int(x),
        Token::Str(s) => Literal::Str(s),
        Token::True => Literal::Bool(true),
        Token::False => Literal::Bool(false),
        Token::None => Literal::None,
    }
    .or(float)
}

pub fn parser<'a>(
    expr: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Expr, Error = ParserError> + Clone + 'a {
    let literal = literal_parser().map_with_span(|lit, span| Expr::new(ExprKind::Literal(lit), span));

    let ident = ident_parser().map_with_span(|name, span| Expr::new(ExprKind::Variable(name), span));

    let paren = expr
        .clone()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .map_with_span(|inner, span| Expr::new(ExprKind::Paren(Box::new(inner)), span));

    // 列表: [1, 2, 3]
    let list = expr
        .clone()
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .delimited_by(just(Token::LBracket), just(Token::RBracket))
        .map_with_span(|items, span| Expr::new(ExprKind::List(items), span));

    // 字典: {"a": 1}
    let dict = expr
        .clone()
        .then_ignore(just(Token::Colon))
        .then(expr)
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with_span(|entries, span| Expr::new(ExprKind::Dict(entries), span));

    choice((literal, ident, paren, list, dict)).labelled("expression")
}
