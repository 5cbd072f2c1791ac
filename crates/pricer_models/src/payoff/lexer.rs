//! Lexer for payoff expressions.
//!
//! Produces a flat token stream terminated by [`TokenKind::Eof`]. Anything
//! outside the numeric expression subset (string literals, attribute access,
//! statement keywords) is rejected here so the parser never sees it.

use super::error::{PayoffError, Span};

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    True,
    False,

    // Identifiers
    Name(String),

    // Keywords
    And,
    Or,
    Not,
    If,
    Else,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    Ne,

    Eof,
}

impl TokenKind {
    /// Short description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Name(name) => format!("name '{name}'"),
            Self::Eof => "end of expression".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::If => "if",
            Self::Else => "else",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::SlashSlash => "//",
            Self::Percent => "%",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::EqEq => "==",
            Self::Ne => "!=",
            Self::Number(_) | Self::Name(_) | Self::Eof => "",
        }
    }
}

/// Words with statement or object semantics that have no place in a payoff.
const RESERVED: &[&str] = &[
    "None", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "except", "finally", "for", "from", "global", "import", "in", "is", "lambda", "nonlocal",
    "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Tokenize a payoff expression.
pub fn tokenize(source: &str) -> Result<Vec<Token>, PayoffError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        // Number literal.
        if ch.is_ascii_digit()
            || (ch == b'.' && pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit())
        {
            let (value, end) = lex_number(source, pos)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        // Identifier or keyword.
        if ch.is_ascii_alphabetic() || ch == b'_' {
            let end = lex_ident_end(bytes, pos);
            let word = &source[pos..end];
            let span = Span::new(start, end);
            let kind = match word {
                "and" => TokenKind::And,
                "or" => TokenKind::Or,
                "not" => TokenKind::Not,
                "if" => TokenKind::If,
                "else" => TokenKind::Else,
                "True" => TokenKind::True,
                "False" => TokenKind::False,
                _ if RESERVED.contains(&word) => {
                    return Err(PayoffError::compile(
                        format!("keyword '{word}' is not allowed in a payoff expression"),
                        span,
                    ));
                }
                _ => TokenKind::Name(word.to_string()),
            };
            tokens.push(Token { kind, span });
            pos = end;
            continue;
        }

        // Two-character operators.
        if pos + 1 < bytes.len() {
            let kind = match &bytes[pos..pos + 2] {
                b"**" => Some(TokenKind::StarStar),
                b"//" => Some(TokenKind::SlashSlash),
                b"<=" => Some(TokenKind::Le),
                b">=" => Some(TokenKind::Ge),
                b"==" => Some(TokenKind::EqEq),
                b"!=" => Some(TokenKind::Ne),
                _ => None,
            };
            if let Some(kind) = kind {
                tokens.push(Token {
                    kind,
                    span: Span::new(start, pos + 2),
                });
                pos += 2;
                continue;
            }
        }

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'.' => {
                return Err(PayoffError::compile(
                    "attribute access is not allowed",
                    Span::new(start, start + 1),
                ));
            }
            b'"' | b'\'' => {
                return Err(PayoffError::compile(
                    "string literals are not allowed",
                    Span::new(start, start + 1),
                ));
            }
            _ => {
                let c = source[pos..].chars().next().unwrap_or('?');
                return Err(PayoffError::compile(
                    format!("unexpected character '{c}'"),
                    Span::new(start, start + c.len_utf8()),
                ));
            }
        };
        tokens.push(Token {
            kind,
            span: Span::new(start, start + 1),
        });
        pos += 1;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(bytes.len(), bytes.len()),
    });
    Ok(tokens)
}

/// Scans digits, allowing single underscores between digits (`1_000`).
fn scan_digits(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() {
        if bytes[pos].is_ascii_digit() {
            pos += 1;
        } else if bytes[pos] == b'_'
            && pos > 0
            && bytes[pos - 1].is_ascii_digit()
            && pos + 1 < bytes.len()
            && bytes[pos + 1].is_ascii_digit()
        {
            pos += 1;
        } else {
            break;
        }
    }
    pos
}

fn lex_number(source: &str, start: usize) -> Result<(f64, usize), PayoffError> {
    let bytes = source.as_bytes();
    let mut pos = scan_digits(bytes, start);

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos = scan_digits(bytes, pos + 1);
    }

    // Exponent: e/E, optional sign, at least one digit.
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = scan_digits(bytes, exp);
        }
    }

    let span = Span::new(start, pos);
    if pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        let end = lex_ident_end(bytes, pos);
        return Err(PayoffError::compile(
            format!("invalid number literal '{}'", &source[start..end]),
            Span::new(start, end),
        ));
    }

    let text: String = source[start..pos].chars().filter(|&c| c != '_').collect();
    text.parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| PayoffError::compile(format!("invalid number literal '{text}'"), span))
}

fn lex_ident_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_call_expression() {
        assert_eq!(
            kinds("max(s - strike, 0)"),
            vec![
                TokenKind::Name("max".into()),
                TokenKind::LParen,
                TokenKind::Name("s".into()),
                TokenKind::Minus,
                TokenKind::Name("strike".into()),
                TokenKind::Comma,
                TokenKind::Number(0.0),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_two_character_operators() {
        assert_eq!(
            kinds("a ** b // c <= d >= e == f != g"),
            vec![
                TokenKind::Name("a".into()),
                TokenKind::StarStar,
                TokenKind::Name("b".into()),
                TokenKind::SlashSlash,
                TokenKind::Name("c".into()),
                TokenKind::Le,
                TokenKind::Name("d".into()),
                TokenKind::Ge,
                TokenKind::Name("e".into()),
                TokenKind::EqEq,
                TokenKind::Name("f".into()),
                TokenKind::Ne,
                TokenKind::Name("g".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(kinds("1.5")[0], TokenKind::Number(1.5));
        assert_eq!(kinds(".25")[0], TokenKind::Number(0.25));
        assert_eq!(kinds("3.")[0], TokenKind::Number(3.0));
        assert_eq!(kinds("1e3")[0], TokenKind::Number(1000.0));
        assert_eq!(kinds("2.5E-2")[0], TokenKind::Number(0.025));
        assert_eq!(kinds("1_000")[0], TokenKind::Number(1000.0));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("not True and False or x if y else z"),
            vec![
                TokenKind::Not,
                TokenKind::True,
                TokenKind::And,
                TokenKind::False,
                TokenKind::Or,
                TokenKind::Name("x".into()),
                TokenKind::If,
                TokenKind::Name("y".into()),
                TokenKind::Else,
                TokenKind::Name("z".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = tokenize("  s + 10").unwrap();
        assert_eq!(tokens[0].span, Span::new(2, 3));
        assert_eq!(tokens[2].span, Span::new(6, 8));
        assert_eq!(tokens[3].span, Span::new(8, 8));
    }

    #[test]
    fn test_rejects_strings() {
        let err = tokenize("max(s, '1')").unwrap_err();
        assert_eq!(
            err,
            PayoffError::compile("string literals are not allowed", Span::new(7, 8))
        );
        assert!(tokenize("\"abc\"").is_err());
    }

    #[test]
    fn test_rejects_attribute_access() {
        let err = tokenize("path.__class__").unwrap_err();
        assert!(matches!(err, PayoffError::Compile { span, .. } if span == Span::new(4, 5)));
    }

    #[test]
    fn test_rejects_unknown_characters() {
        for source in ["s @ 2", "s; 1", "{}", "s = 1", "`s`", "s € 1"] {
            assert!(tokenize(source).is_err(), "{source} should not tokenize");
        }
    }

    #[test]
    fn test_rejects_reserved_keywords() {
        for source in ["lambda: 1", "import os", "x for x in path", "None"] {
            assert!(tokenize(source).is_err(), "{source} should not tokenize");
        }
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        assert!(tokenize("1abc").is_err());
        assert!(tokenize("0x1F").is_err());
        assert!(tokenize("1e").is_err());
    }
}
