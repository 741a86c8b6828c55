//! The source-to-value pipeline.

use tracing::debug;

use tern_diagnostic::Diagnostic;
use tern_eval::{Interpreter, SharedPrintHandler, Value};
use tern_ir::StringInterner;

/// Everything a run produced: the final value (when evaluation happened
/// and succeeded) and all diagnostics in emission order.
pub struct RunOutcome {
    pub value: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse and evaluate `source`, routing `print` output through `print`.
///
/// Parse errors stop the run before evaluation; warnings alone do not.
/// A runtime error appends its diagnostic after any parse warnings.
pub fn run_source(source: &str, print: SharedPrintHandler) -> RunOutcome {
    let interner = StringInterner::new();
    let parsed = tern_parse::parse(source, &interner);
    debug!(
        statements = parsed.arena.stmt_count(),
        diagnostics = parsed.diagnostics.len(),
        "parsed source"
    );

    let mut diagnostics = parsed.diagnostics;
    if diagnostics.iter().any(Diagnostic::is_error) {
        return RunOutcome {
            value: None,
            diagnostics,
        };
    }

    let mut interp = Interpreter::with_print_handler(&interner, &parsed.arena, print);
    match interp.run(&parsed.module) {
        Ok(value) => RunOutcome {
            value: Some(value),
            diagnostics,
        },
        Err(error) => {
            diagnostics.push(error.to_diagnostic());
            RunOutcome {
                value: None,
                diagnostics,
            }
        }
    }
}
