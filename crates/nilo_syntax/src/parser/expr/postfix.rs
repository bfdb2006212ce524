//! 后缀链 (trailers)
//!
//! `primary := atom trailer*`，trailer 为 `.NAME`、`?.NAME`、`[expr]`、`?[expr]`
//! 或 `(args)`。链按 foldl 组装成嵌套的 Attribute / Index / Call 节点，
//! 最内层是原子（括号表达式也是原子，因此是链的边界）。

use super::super::helpers::ident_parser;
use super::ParserError;
use crate::ast::*;
use crate::lexer::Token;
use chumsky::prelude::*;

/// 单个后缀操作
#[derive(Debug, Clone, PartialEq)]
pub enum Trailer {
    Attribute {
        name: String,
        span: Span,
        short_circuiting: bool,
    },
    Index {
        index: Expr,
        span: Span,
        short_circuiting: bool,
    },
    Call {
        args: Vec<Expr>,
        span: Span,
    },
}

impl Trailer {
    pub fn short_circuiting(&self) -> bool {
        match self {
            Trailer::Attribute {
                short_circuiting, ..
            }
            | Trailer::Index {
                short_circuiting, ..
            } => *short_circuiting,
            Trailer::Call { .. } => false,
        }
    }

    /// 把 trailer 接到 lhs 上
    fn apply(self, lhs: Expr) -> Expr {
        match self {
            Trailer::Attribute {
                name,
                span,
                short_circuiting,
            } => {
                let span = lhs.span.start..span.end;
                Expr::new(
                    ExprKind::Attribute {
                        object: Box::new(lhs),
                        name,
                        short_circuiting,
                    },
                    span,
                )
            }
            Trailer::Index {
                index,
                span,
                short_circuiting,
            } => {
                let span = lhs.span.start..span.end;
                Expr::new(
                    ExprKind::Index {
                        object: Box::new(lhs),
                        index: Box::new(index),
                        short_circuiting,
                    },
                    span,
                )
            }
            Trailer::Call { args, span } => {
                let span = lhs.span.start..span.end;
                Expr::new(
                    ExprKind::Call {
                        callee: Box::new(lhs),
                        args,
                    },
                    span,
                )
            }
        }
    }
}

/// 解析单个 trailer
pub fn trailer_parser<'a>(
    expr: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Trailer, Error = ParserError> + Clone + 'a {
    // .name / ?.name
    let attribute = just(Token::Dot)
        .to(false)
        .or(just(Token::QuestionDot).to(true))
        .then(ident_parser())
        .map_with_span(|(short_circuiting, name), span| Trailer::Attribute {
            name,
            span,
            short_circuiting,
        });

    // [expr] / ?[expr]
    let index = expr
        .clone()
        .delimited_by(just(Token::LBracket), just(Token::RBracket))
        .map(|index| (false, index))
        .or(expr
            .clone()
            .delimited_by(just(Token::QuestionBracket), just(Token::RBracket))
            .map(|index| (true, index)))
        .map_with_span(|(short_circuiting, index), span| Trailer::Index {
            index,
            span,
            short_circuiting,
        });

    // (args)，没有 `?(` 形式
    let call = expr
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .map_with_span(|args, span| Trailer::Call { args, span });

    choice((attribute, index, call))
}

/// atom 后接任意多个 trailer
pub fn primary_parser<'a>(
    atom: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
    expr: impl Parser<Token, Expr, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Expr, Error = ParserError> + Clone + 'a {
    atom.then(trailer_parser(expr).repeated())
        .foldl(|lhs, trailer| trailer.apply(lhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::expr::expr_parser;
    use chumsky::Stream;

    fn trailers(source: &str) -> Vec<Trailer> {
        let tokens = tokenize(source).expect("tokenize failed");
        let len = source.len();
        trailer_parser(expr_parser())
            .repeated()
            .then_ignore(end())
            .parse(Stream::from_iter(len..len, tokens.into_iter()))
            .expect("trailers failed")
    }

    #[test]
    fn test_trailer_flags() {
        let parsed = trailers("?.b(1).d?[e][0]");
        let flags: Vec<bool> = parsed.iter().map(Trailer::short_circuiting).collect();
        assert_eq!(flags, vec![true, false, false, true, false]);
        assert!(matches!(&parsed[1], Trailer::Call { args, .. } if args.len() == 1));
    }

    #[test]
    fn test_trailer_spans() {
        let parsed = trailers("?.name");
        assert_eq!(
            parsed,
            vec![Trailer::Attribute {
                name: "name".into(),
                span: 0..6,
                short_circuiting: true,
            }]
        );
    }
}
