//! Command handlers for the tern CLI.
//!
//! Each submodule implements one command; shared helpers like `read_file`
//! live in the module root.

use std::sync::Once;

mod check;
mod debug;
mod explain;
mod run;

pub use check::check_file;
pub use debug::{lex_file, parse_file};
pub use explain::explain_error;
pub use run::run_file;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, reading directives from `TERN_LOG`.
///
/// Call once at startup; safe to call again. Does nothing when `TERN_LOG`
/// is unset, so normal runs stay quiet.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("TERN_LOG").is_ok() {
            let filter = EnvFilter::from_env("TERN_LOG");
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Read a file from disk, exiting with a friendly message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
