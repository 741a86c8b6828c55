//! Lexer error types.
//!
//! The lexer never aborts: it records errors here, pushes an `Error` token
//! so the parser sees where the bad input was, and keeps scanning. The
//! parser turns these into diagnostics.

use std::fmt;

use tern_ir::Span;

/// A lexing error with its source location.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}

/// What went wrong while scanning.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A byte sequence no token starts with.
    UnrecognizedChar { found: char },
    /// A string literal missing its closing `"` before newline or EOF.
    UnterminatedString,
    /// A numeric literal that does not fit its type.
    InvalidNumber,
    /// An escape sequence the language does not define (e.g. `\q`).
    InvalidEscape { found: char },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnrecognizedChar { found } => {
                write!(f, "unrecognized character `{}`", found.escape_default())
            }
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::InvalidNumber => write!(f, "numeric literal out of range"),
            LexErrorKind::InvalidEscape { found } => {
                write!(f, "unknown escape sequence `\\{}`", found.escape_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            LexErrorKind::UnrecognizedChar { found: '@' }.to_string(),
            "unrecognized character `@`"
        );
        assert_eq!(
            LexErrorKind::UnterminatedString.to_string(),
            "unterminated string literal"
        );
        assert_eq!(
            LexErrorKind::InvalidEscape { found: 'q' }.to_string(),
            "unknown escape sequence `\\q`"
        );
    }

    #[test]
    fn control_chars_are_escaped_in_messages() {
        let msg = LexErrorKind::UnrecognizedChar { found: '\u{1}' }.to_string();
        assert_eq!(msg, "unrecognized character `\\u{1}`");
    }
}
