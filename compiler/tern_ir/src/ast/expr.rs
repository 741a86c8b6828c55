//! Expression nodes.

use std::fmt;

use super::ids::{ExprId, ExprRange};
use super::operators::{BinaryOp, UnaryOp};
use crate::{Name, Span};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
///
/// All children are arena indices, so the whole enum stays `Copy`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),
    /// Float literal: `3.14` (stored as bits for `Eq`/`Hash`)
    Float(u64),
    /// String literal (interned): `"hello"`
    Str(Name),
    /// Boolean literal: `true` / `false`
    Bool(bool),
    /// The `none` literal.
    None,

    /// Name reference.
    Ident(Name),

    /// Statement binding: `(expr as name)`.
    ///
    /// Evaluates `expr`, binds the result to `name` for the remainder of
    /// the enclosing statement, and yields the value unchanged.
    /// `name_span` covers the bound identifier for diagnostics.
    Binding {
        expr: ExprId,
        name: Name,
        name_span: Span,
    },

    /// Binary operation: `lhs op rhs`.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Unary operation: `-expr`, `not expr`.
    Unary { op: UnaryOp, expr: ExprId },

    /// Function call: `callee(args...)`.
    Call { callee: ExprId, args: ExprRange },

    /// Index access: `target[index]`.
    Index { target: ExprId, index: ExprId },

    /// List literal: `[a, b, c]`.
    List { elems: ExprRange },

    /// Placeholder produced by parser error recovery.
    ///
    /// Never present in a module whose parse reported no errors.
    Error,
}
