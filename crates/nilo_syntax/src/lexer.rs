//! Lexer
//!
//! 基于 logos 的词法分析。换行是语句分隔符，但在括号内部会被丢弃
//! （隐式续行），因此 `tokenize` 在 logos 之上多做一次括号深度跟踪。

use crate::ast::Span;
use crate::error::{SyntaxError, SyntaxErrorKind};
use logos::{Lexer, Logos};
use std::fmt;

/// logos 的词法错误
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexError {
    #[default]
    Unknown,
    IntegerTooLarge,
}

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)] // chumsky 的 Simple 需要 Eq + Hash
#[logos(skip r"([ \t\r\f]+|\\\n)")]
#[logos(error = LexError)]
pub enum Token {
    // --- 关键字 ---
    #[token("None")]
    None,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("is")]
    Is,

    // --- 算术 ---
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("**")]
    DoubleStar,

    // --- 比较 ---
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,

    // --- 赋值 ---
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("//=")]
    DoubleSlashEq,
    #[token("%=")]
    PercentEq,
    #[token("**=")]
    DoubleStarEq,
    #[token("??=")]
    QuestionQuestionEq,

    // --- None 相关运算符 ---
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,
    #[token("?[")]
    QuestionBracket,

    // --- 分隔符 ---
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("\n")]
    Newline,

    // --- 数据 ---
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().map_err(|_| LexError::IntegerTooLarge))]
    Int(i64),

    // f64 没有 Eq/Hash，先存字符串，解析阶段再转换
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Float(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, unescape)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, unescape)]
    Str(String),

    #[regex(r"#[^\n]*", logos::skip)]
    Comment,
}

fn unescape(lex: &mut Lexer<Token>) -> String {
    let s = lex.slice();
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(o) => out.push(o),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Token {
    /// 是否打开一层括号（包括 `?[`）
    fn opens_group(&self) -> bool {
        matches!(
            self,
            Token::LParen | Token::LBracket | Token::LBrace | Token::QuestionBracket
        )
    }

    fn closes_group(&self) -> bool {
        matches!(self, Token::RParen | Token::RBracket | Token::RBrace)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::None => "None",
            Token::True => "True",
            Token::False => "False",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Is => "is",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::DoubleSlash => "//",
            Token::Percent => "%",
            Token::DoubleStar => "**",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Leq => "<=",
            Token::Geq => ">=",
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::DoubleSlashEq => "//=",
            Token::PercentEq => "%=",
            Token::DoubleStarEq => "**=",
            Token::QuestionQuestionEq => "??=",
            Token::QuestionQuestion => "??",
            Token::QuestionDot => "?.",
            Token::QuestionBracket => "?[",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Newline => "newline",
            Token::Comment => "comment",
            Token::Ident(name) => return write!(f, "identifier '{}'", name),
            Token::Int(n) => return write!(f, "{}", n),
            Token::Float(s) => return write!(f, "{}", s),
            Token::Str(s) => return write!(f, "{:?}", s),
        };
        write!(f, "'{}'", text)
    }
}

/// 词法分析整段源码，返回带 span 的 token 序列
///
/// 括号内部的换行被丢弃，其余换行保留为 [`Token::Newline`]。
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    for (tok, span) in Token::lexer(source).spanned() {
        let tok = tok.map_err(|e| {
            let text = &source[span.clone()];
            match e {
                LexError::Unknown => SyntaxError::unknown_token(text, span.clone()),
                LexError::IntegerTooLarge => SyntaxError::new(
                    SyntaxErrorKind::IntegerTooLarge(text.to_string()),
                    span.clone(),
                ),
            }
        })?;

        if tok.opens_group() {
            depth += 1;
        } else if tok.closes_group() {
            depth = depth.saturating_sub(1);
        } else if tok == Token::Newline && depth > 0 {
            continue;
        }
        tokens.push((tok, span));
    }

    log::trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn test_lexer_basic() {
        let mut lexer = Token::lexer("a = 10 + 20");

        assert_eq!(lexer.next(), Some(Ok(Token::Ident("a".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::Eq)));
        assert_eq!(lexer.next(), Some(Ok(Token::Int(10))));
        assert_eq!(lexer.next(), Some(Ok(Token::Plus)));
        assert_eq!(lexer.next(), Some(Ok(Token::Int(20))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_none_aware_operators() {
        assert_eq!(
            kinds("a ?? b ??= c?.d?[e]"),
            vec![
                Token::Ident("a".into()),
                Token::QuestionQuestion,
                Token::Ident("b".into()),
                Token::QuestionQuestionEq,
                Token::Ident("c".into()),
                Token::QuestionDot,
                Token::Ident("d".into()),
                Token::QuestionBracket,
                Token::Ident("e".into()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_longest_match_operators() {
        assert_eq!(
            kinds("x **= 2 // 3 ** 4 //= 5"),
            vec![
                Token::Ident("x".into()),
                Token::DoubleStarEq,
                Token::Int(2),
                Token::DoubleSlash,
                Token::Int(3),
                Token::DoubleStar,
                Token::Int(4),
                Token::DoubleSlashEq,
                Token::Int(5),
            ]
        );
    }

    #[test]
    fn test_int_then_attribute() {
        // `5.d` 不是浮点数
        assert_eq!(
            kinds("5.d"),
            vec![Token::Int(5), Token::Dot, Token::Ident("d".into())]
        );
        assert_eq!(kinds("2.5e3"), vec![Token::Float("2.5e3".into())]);
    }

    #[test]
    fn test_strings_and_comments() {
        assert_eq!(
            kinds(r#"'it\'s' "a\tb" # trailing comment"#),
            vec![Token::Str("it's".into()), Token::Str("a\tb".into())]
        );
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(
            kinds("None Nonesuch is not"),
            vec![
                Token::None,
                Token::Ident("Nonesuch".into()),
                Token::Is,
                Token::Not
            ]
        );
    }

    #[test]
    fn test_implicit_line_joining() {
        assert_eq!(
            kinds("f(1,\n 2)\nx"),
            vec![
                Token::Ident("f".into()),
                Token::LParen,
                Token::Int(1),
                Token::Comma,
                Token::Int(2),
                Token::RParen,
                Token::Newline,
                Token::Ident("x".into()),
            ]
        );
        // `?[` 同样打开一层括号
        assert!(!kinds("a?[\n0]").contains(&Token::Newline));
    }

    #[test]
    fn test_unknown_token() {
        let err = tokenize("a ? b").unwrap_err();
        assert_eq!(err.span, 2..3);
        assert!(err.to_string().contains("'?'"));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::QuestionQuestion.to_string(), "'??'");
        assert_eq!(Token::Ident("x".into()).to_string(), "identifier 'x'");
    }
}
