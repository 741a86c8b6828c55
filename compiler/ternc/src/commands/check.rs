//! The `check` command: parse and lint a file without running it.

use std::io::IsTerminal;

use tern_diagnostic::{ColorMode, TerminalEmitter};
use tern_ir::StringInterner;

use super::read_file;

/// Parse a file and report every diagnostic, evaluating nothing.
pub fn check_file(path: &str, color: ColorMode) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let result = tern_parse::parse(&source, &interner);

    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::stderr(color, is_tty)
        .with_source(source.as_str())
        .with_file_path(path);
    emitter.emit_all(&result.diagnostics);
    emitter.emit_summary(result.error_count(), result.warning_count());
    emitter.flush();

    if result.has_errors() {
        std::process::exit(1);
    }

    println!(
        "OK: {path} ({} statements, {} expressions)",
        result.arena.stmt_count(),
        result.arena.expr_count()
    );
}
