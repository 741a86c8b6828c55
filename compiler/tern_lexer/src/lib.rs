//! Lexer for tern using logos with string interning.
//!
//! [`lex`] scans the whole source in one pass and returns the token stream
//! together with any lexing errors. Errors never stop the scan: the bad
//! region becomes a [`TokenKind::Error`] token and lexing continues, so the
//! parser always receives a complete, EOF-terminated stream.

use logos::Logos;
use tern_ir::{Span, StringInterner, Token, TokenKind};

mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
enum RawToken {
    #[regex(r"#[^\n]*")]
    LineComment,

    #[token("\n")]
    Newline,

    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("fn")]
    Fn,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("as")]
    As,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    None,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Integer (sign is applied by the parser as unary minus)
    #[regex(r"[0-9][0-9_]*", |lex| {
        lex.slice().replace('_', "").parse::<i64>().ok()
    })]
    Int(i64),

    // Float
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().replace('_', "").parse::<f64>().ok()
    })]
    Float(f64),

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    Str,

    // String start that never finds its closing quote. The terminated
    // pattern above always wins when a closing quote exists, because the
    // combined automaton takes the longest match.
    #[regex(r#""([^"\\\n\r]|\\.)*"#)]
    UnterminatedStr,

    // Identifier
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Lex source code into a token stream plus any errors encountered.
///
/// The stream always ends with a zero-width [`TokenKind::Eof`] token at the
/// end of the source.
pub fn lex(source: &str, interner: &StringInterner) -> (Vec<Token>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment) => {}
            Ok(RawToken::UnterminatedStr) => {
                errors.push(LexError::new(LexErrorKind::UnterminatedString, span));
                tokens.push(Token::new(TokenKind::Error, span));
            }
            Ok(raw) => {
                let kind = convert_token(raw, slice, span, interner, &mut errors);
                tokens.push(Token::new(kind, span));
            }
            Err(()) => {
                errors.push(LexError::new(classify_error(slice), span));
                tokens.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    // Add EOF token
    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source file exceeds {} bytes", u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    (tokens, errors)
}

/// Convert a raw token to a `TokenKind`, interning strings.
fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
    errors: &mut Vec<LexError>,
) -> TokenKind {
    match raw {
        // Literals
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::Str => {
            let content = &slice[1..slice.len() - 1];
            let unescaped = unescape_string(content, span.start + 1, errors);
            TokenKind::Str(interner.intern_owned(unescaped))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        // Keywords
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::As => TokenKind::As,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::None => TokenKind::None,

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Newline => TokenKind::Newline,

        // Operators
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,

        // Handled in the lex loop before conversion
        RawToken::LineComment | RawToken::UnterminatedStr => {
            unreachable!("trivia and error tokens are filtered before conversion")
        }
    }
}

/// Classify a logos error slice into a specific error kind.
fn classify_error(slice: &str) -> LexErrorKind {
    let first = slice.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
    if first.is_ascii_digit() {
        // The numeric pattern matched but its callback rejected the value.
        LexErrorKind::InvalidNumber
    } else {
        LexErrorKind::UnrecognizedChar { found: first }
    }
}

/// Process string escape sequences, reporting unknown escapes.
///
/// `content_start` is the byte offset of `content` within the source (one
/// past the opening quote), used to span escape errors precisely. Unknown
/// escapes are kept verbatim so evaluation can proceed.
fn unescape_string(content: &str, content_start: u32, errors: &mut Vec<LexError>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, 't')) => result.push('\t'),
            Some((_, '\\')) => result.push('\\'),
            Some((_, '"')) => result.push('"'),
            Some((_, '0')) => result.push('\0'),
            Some((_, other)) => {
                let start = content_start + u32::try_from(offset).unwrap_or(u32::MAX);
                let end = start + 1 + u32::try_from(other.len_utf8()).unwrap_or(1);
                errors.push(LexError::new(
                    LexErrorKind::InvalidEscape { found: other },
                    Span::new(start, end),
                ));
                result.push('\\');
                result.push(other);
            }
            // Trailing backslash cannot occur in a terminated literal, but
            // keep it if it somehow does.
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = StringInterner::new();
        let (tokens, errors) = lex(source, &interner);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_assignment() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex("total = 42", &interner);

        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 4); // total, =, 42, EOF
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[1].kind, TokenKind::Eq);
        assert_eq!(tokens[2].kind, TokenKind::Int(42));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let ks = kinds("if elsewhere as aside while");
        assert_eq!(ks[0], TokenKind::If);
        assert!(matches!(ks[1], TokenKind::Ident(_)));
        assert_eq!(ks[2], TokenKind::As);
        assert!(matches!(ks[3], TokenKind::Ident(_)));
        assert_eq!(ks[4], TokenKind::While);
    }

    #[test]
    fn binding_form_tokens() {
        let ks = kinds("(fetch(url) as page)");
        assert_eq!(
            ks.iter()
                .filter(|k| matches!(k, TokenKind::As))
                .count(),
            1
        );
        assert_eq!(ks[0], TokenKind::LParen);
        assert_eq!(ks[ks.len() - 2], TokenKind::RParen);
    }

    #[test]
    fn string_escapes() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex(r#""line\none\ttab\"q\"""#, &interner);

        assert!(errors.is_empty());
        if let TokenKind::Str(name) = tokens[0].kind {
            assert_eq!(interner.lookup(name), "line\none\ttab\"q\"");
        } else {
            panic!("expected string token, got {:?}", tokens[0].kind);
        }
    }

    #[test]
    fn invalid_escape_is_reported_and_kept() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex(r#""bad\qescape""#, &interner);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidEscape { found: 'q' });
        // Span covers the two bytes of `\q` inside the literal.
        assert_eq!(errors[0].span, Span::new(4, 6));
        if let TokenKind::Str(name) = tokens[0].kind {
            assert_eq!(interner.lookup(name), "bad\\qescape");
        } else {
            panic!("expected string token");
        }
    }

    #[test]
    fn unterminated_string() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex("msg = \"oops\nnext = 1", &interner);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(errors[0].span, Span::new(6, 11));
        // Error token in place, then the newline, then the next statement.
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[3].kind, TokenKind::Newline);
        assert!(matches!(tokens[4].kind, TokenKind::Ident(_)));
    }

    #[test]
    fn numbers() {
        let ks = kinds("0 12 1_000 3.5 2.5e3 1_0.2_5");
        assert_eq!(ks[0], TokenKind::Int(0));
        assert_eq!(ks[1], TokenKind::Int(12));
        assert_eq!(ks[2], TokenKind::Int(1000));
        assert_eq!(ks[3], TokenKind::Float(3.5f64.to_bits()));
        assert_eq!(ks[4], TokenKind::Float(2500.0f64.to_bits()));
        assert_eq!(ks[5], TokenKind::Float(10.25f64.to_bits()));
    }

    #[test]
    fn integer_overflow_is_invalid_number() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex("9223372036854775808", &interner);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidNumber);
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn comments_are_skipped() {
        let ks = kinds("x # trailing comment\n# full line\ny");
        assert!(matches!(ks[0], TokenKind::Ident(_)));
        assert_eq!(ks[1], TokenKind::Newline);
        assert_eq!(ks[2], TokenKind::Newline);
        assert!(matches!(ks[3], TokenKind::Ident(_)));
    }

    #[test]
    fn unrecognized_character() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex("a $ b", &interner);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            LexErrorKind::UnrecognizedChar { found: '$' }
        );
        assert_eq!(tokens[1].kind, TokenKind::Error);
    }

    #[test]
    fn comparison_operators() {
        let ks = kinds("a <= b >= c == d != e < f > g");
        let ops: Vec<_> = ks
            .iter()
            .filter(|k| !matches!(k, TokenKind::Ident(_) | TokenKind::Eof))
            .collect();
        assert_eq!(
            ops,
            vec![
                &TokenKind::LtEq,
                &TokenKind::GtEq,
                &TokenKind::EqEq,
                &TokenKind::NotEq,
                &TokenKind::Lt,
                &TokenKind::Gt,
            ]
        );
    }

    #[test]
    fn eof_span_is_at_source_end() {
        let interner = StringInterner::new();
        let (tokens, _) = lex("ab", &interner);
        let eof = tokens.last().copied();
        assert!(matches!(
            eof,
            Some(Token {
                kind: TokenKind::Eof,
                span
            }) if span == Span::point(2)
        ));
    }

    #[test]
    fn empty_source_is_just_eof() {
        let interner = StringInterner::new();
        let (tokens, errors) = lex("", &interner);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].span, Span::point(0));
    }

    #[test]
    fn semicolon_and_newline_both_terminate() {
        let ks = kinds("a; b\nc");
        assert!(matches!(ks[0], TokenKind::Ident(_)));
        assert_eq!(ks[1], TokenKind::Semicolon);
        assert!(matches!(ks[2], TokenKind::Ident(_)));
        assert_eq!(ks[3], TokenKind::Newline);
        assert!(matches!(ks[4], TokenKind::Ident(_)));
    }

    #[test]
    fn spans_cover_source_exactly() {
        let source = "x = (load() as v)";
        let interner = StringInterner::new();
        let (tokens, _) = lex(source, &interner);

        for token in &tokens {
            assert!(token.span.end as usize <= source.len());
            assert!(token.span.start <= token.span.end);
        }
    }
}
