//! Embedded error documentation for `--explain` support.
//!
//! Each documented error code has a markdown file that explains the error,
//! shows an example, and describes the fix. The files are embedded at
//! compile time and retrieved via `ErrorDocs::get()`.
//!
//! # Adding New Documentation
//!
//! 1. Create a new file `EXXXX.md` under `src/docs/`
//! 2. Add an entry to the `DOCS` array below

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code.
    ///
    /// Returns `None` when the code has no extended documentation.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }
}

/// Embedded documentation for each error code.
static DOCS: &[(ErrorCode, &str)] = &[
    // Lexer errors (E0xxx)
    (ErrorCode::E0001, include_str!("docs/E0001.md")),
    (ErrorCode::E0002, include_str!("docs/E0002.md")),
    // Parser errors (E1xxx)
    (ErrorCode::E1001, include_str!("docs/E1001.md")),
    (ErrorCode::E1002, include_str!("docs/E1002.md")),
    (ErrorCode::E1005, include_str!("docs/E1005.md")),
    // Runtime errors (E6xxx)
    (ErrorCode::E6001, include_str!("docs/E6001.md")),
    (ErrorCode::E6003, include_str!("docs/E6003.md")),
    // Warnings (W1xxx)
    (ErrorCode::W1001, include_str!("docs/W1001.md")),
];
