//! The `run` command: parse and evaluate a tern source file.

use std::io::IsTerminal;

use tern_diagnostic::{ColorMode, TerminalEmitter};
use tern_eval::{PrintHandler, Value};

use super::read_file;
use crate::run_source;

/// Run a file: report every diagnostic, then print the final value.
///
/// Exits 1 when any error was reported. The module's result value prints
/// to stdout unless it is `none`, matching interactive expectations.
pub fn run_file(path: &str, color: ColorMode) {
    let source = read_file(path);
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::stderr(color, is_tty)
        .with_source(source.as_str())
        .with_file_path(path);

    let outcome = run_source(&source, PrintHandler::stdout());

    emitter.emit_all(&outcome.diagnostics);
    let errors = outcome.diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = outcome.diagnostics.len() - errors;
    emitter.emit_summary(errors, warnings);
    emitter.flush();

    if errors > 0 {
        std::process::exit(1);
    }

    if let Some(value) = outcome.value {
        if !matches!(value, Value::None) {
            println!("{value}");
        }
    }
}
