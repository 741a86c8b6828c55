//! Frontend for tern source: lexing, parsing, and post-parse lints.
//!
//! [`parse`] is the main entry point. It runs the lexer, parses the token
//! stream into an [`tern_ir::AstArena`], converts lexer errors into
//! diagnostics, and appends binding lints. The result always carries a
//! best-effort tree; callers decide whether errors block evaluation.

mod parser;
mod warnings;

pub use parser::{ParseResult, Parser};

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::StringInterner;
use tern_lexer::{LexError, LexErrorKind};

/// Lex and parse `source`, interning strings into `interner`.
///
/// Diagnostics are ordered lexer errors first, then parser errors, then
/// warnings.
pub fn parse(source: &str, interner: &StringInterner) -> ParseResult {
    let (tokens, lex_errors) = tern_lexer::lex(source, interner);
    let mut result = Parser::new(&tokens).parse_module();

    if !lex_errors.is_empty() {
        let mut diagnostics: Vec<Diagnostic> =
            lex_errors.iter().map(lex_error_to_diagnostic).collect();
        diagnostics.append(&mut result.diagnostics);
        result.diagnostics = diagnostics;
    }

    let lints = warnings::scan_duplicate_bindings(&result.module, &result.arena, interner);
    result.diagnostics.extend(lints);

    result
}

fn lex_error_to_diagnostic(error: &LexError) -> Diagnostic {
    match error.kind {
        LexErrorKind::UnrecognizedChar { .. } => Diagnostic::error(ErrorCode::E0001)
            .with_message(error.kind.to_string())
            .with_label(error.span, "not valid in tern source"),
        LexErrorKind::UnterminatedString => Diagnostic::error(ErrorCode::E0002)
            .with_message(error.kind.to_string())
            .with_label(error.span, "string starts here")
            .with_note("strings must close before the end of the line"),
        LexErrorKind::InvalidNumber => Diagnostic::error(ErrorCode::E0003)
            .with_message(error.kind.to_string())
            .with_label(error.span, "does not fit in a 64-bit integer"),
        LexErrorKind::InvalidEscape { .. } => Diagnostic::error(ErrorCode::E0004)
            .with_message(error.kind.to_string())
            .with_label(error.span, "unknown escape")
            .with_suggestion("valid escapes are \\n, \\r, \\t, \\\\, \\\", and \\0"),
    }
}
