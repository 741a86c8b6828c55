//! Debug commands: `parse` and `lex` for inspecting interpreter internals.

use tern_ir::StringInterner;

use super::read_file;

/// Parse a file and display a summary of the tree and its diagnostics.
pub fn parse_file(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let result = tern_parse::parse(&source, &interner);

    println!("Parse result for '{path}':");
    println!("  Statements:  {}", result.arena.stmt_count());
    println!("  Expressions: {}", result.arena.expr_count());
    println!("  Errors:      {}", result.error_count());
    println!("  Warnings:    {}", result.warning_count());

    if !result.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for diag in &result.diagnostics {
            match diag.primary_span() {
                Some(span) => println!("  {} @ {:?}: {}", diag.code, span, diag.message),
                None => println!("  {}: {}", diag.code, diag.message),
            }
        }
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let (tokens, errors) = tern_lexer::lex(&source, &interner);

    println!("Tokens for '{path}' ({} tokens):", tokens.len());
    for token in &tokens {
        println!("  {:?} @ {:?}", token.kind, token.span);
    }

    if !errors.is_empty() {
        println!();
        println!("Lex errors:");
        for error in &errors {
            println!("  {} @ {:?}", error.kind, error.span);
        }
    }
}
