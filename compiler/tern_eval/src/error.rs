//! Runtime error types and their mapping onto diagnostics.

use std::fmt;

use thiserror::Error as ThisError;

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::Span;

use crate::value::Value;

/// Result alias for evaluation; most operations produce a [`Value`].
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// What went wrong at runtime.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum EvalErrorKind {
    #[error("undefined name `{name}`")]
    UndefinedName { name: String },

    #[error("cannot apply `{op}` to {lhs} and {rhs}")]
    InvalidBinaryOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("cannot apply unary `{op}` to {operand}")]
    InvalidUnaryOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[error("cannot index {target} with {index}")]
    NotIndexable {
        target: &'static str,
        index: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("{type_name} is not callable")]
    NotCallable { type_name: &'static str },

    #[error("`{name}` expects {expected}, found {found}")]
    WrongArgCount {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("index {index} out of bounds for {type_name} of length {len}")]
    IndexOutOfBounds {
        index: i64,
        len: usize,
        type_name: &'static str,
    },

    #[error("`break` outside a loop")]
    BreakOutsideLoop,

    #[error("`continue` outside a loop")]
    ContinueOutsideLoop,

    #[error("`return` outside a function")]
    ReturnOutsideFunction,

    #[error("recursion limit of {limit} calls exceeded")]
    RecursionLimit { limit: usize },

    #[error("invalid argument to {builtin}(): {message}")]
    InvalidBuiltinArg {
        builtin: &'static str,
        message: String,
    },

    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: &'static str },

    #[error("cannot evaluate invalid syntax")]
    InvalidSyntax,
}

impl EvalErrorKind {
    /// The diagnostic code this kind renders under.
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::UndefinedName { .. } => ErrorCode::E6001,
            EvalErrorKind::InvalidBinaryOperands { .. }
            | EvalErrorKind::InvalidUnaryOperand { .. }
            | EvalErrorKind::NotIndexable { .. } => ErrorCode::E6002,
            EvalErrorKind::DivisionByZero | EvalErrorKind::ModuloByZero => ErrorCode::E6003,
            EvalErrorKind::NotCallable { .. } => ErrorCode::E6004,
            EvalErrorKind::WrongArgCount { .. } => ErrorCode::E6005,
            EvalErrorKind::IndexOutOfBounds { .. } => ErrorCode::E6006,
            EvalErrorKind::BreakOutsideLoop
            | EvalErrorKind::ContinueOutsideLoop
            | EvalErrorKind::ReturnOutsideFunction => ErrorCode::E6007,
            EvalErrorKind::RecursionLimit { .. } => ErrorCode::E6008,
            EvalErrorKind::InvalidBuiltinArg { .. } => ErrorCode::E6009,
            EvalErrorKind::IntegerOverflow { .. } => ErrorCode::E6010,
            EvalErrorKind::InvalidSyntax => ErrorCode::E1002,
        }
    }
}

/// A runtime error with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
    /// Secondary site shown alongside the error, e.g. where an expired
    /// binding was made.
    pub related: Option<(Span, String)>,
    pub notes: Vec<String>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        EvalError {
            kind,
            span,
            related: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Render as a diagnostic for the terminal emitter.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, primary_label(&self.kind));
        if let Some((span, message)) = &self.related {
            diag = diag.with_secondary_label(*span, message.clone());
        }
        for note in &self.notes {
            diag = diag.with_note(note.clone());
        }
        diag
    }
}

fn primary_label(kind: &EvalErrorKind) -> &'static str {
    match kind {
        EvalErrorKind::UndefinedName { .. } => "not found in this scope",
        EvalErrorKind::InvalidBinaryOperands { .. }
        | EvalErrorKind::InvalidUnaryOperand { .. }
        | EvalErrorKind::NotIndexable { .. } => "type mismatch here",
        EvalErrorKind::DivisionByZero | EvalErrorKind::ModuloByZero => "the divisor is zero",
        EvalErrorKind::NotCallable { .. } => "call target is not a function",
        EvalErrorKind::WrongArgCount { .. } | EvalErrorKind::InvalidBuiltinArg { .. } => {
            "in this call"
        }
        EvalErrorKind::IndexOutOfBounds { .. } => "index out of range",
        EvalErrorKind::BreakOutsideLoop
        | EvalErrorKind::ContinueOutsideLoop
        | EvalErrorKind::ReturnOutsideFunction => "not allowed here",
        EvalErrorKind::RecursionLimit { .. } => "call depth exceeded here",
        EvalErrorKind::IntegerOverflow { .. } => "result does not fit in an integer",
        EvalErrorKind::InvalidSyntax => "this expression did not parse",
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kinds_map_to_codes() {
        let undefined = EvalErrorKind::UndefinedName {
            name: "x".to_string(),
        };
        assert_eq!(undefined.code(), ErrorCode::E6001);
        assert_eq!(EvalErrorKind::DivisionByZero.code(), ErrorCode::E6003);
        assert_eq!(EvalErrorKind::BreakOutsideLoop.code(), ErrorCode::E6007);
        assert_eq!(EvalErrorKind::InvalidSyntax.code(), ErrorCode::E1002);
    }

    #[test]
    fn diagnostic_carries_related_site() {
        let error = EvalError::new(
            EvalErrorKind::UndefinedName {
                name: "tmp".to_string(),
            },
            Span::new(10, 13),
        )
        .with_related(Span::new(2, 5), "bound here with `as`")
        .with_note("statement bindings last only until the end of their statement");

        let diag = error.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E6001);
        assert!(diag.message.contains("tmp"));
        assert_eq!(diag.labels.len(), 2);
        assert!(diag.labels.iter().any(|l| !l.is_primary));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn display_matches_kind() {
        let error = EvalError::new(EvalErrorKind::DivisionByZero, Span::new(0, 5));
        assert_eq!(error.to_string(), "division by zero");
    }
}
