//! Statement nodes.

use std::fmt;

use super::ids::{ArmRange, ExprId, ParamRange, StmtRange};
use crate::{Name, Span};

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression statement.
    Expr(ExprId),

    /// Assignment: `name = expr`.
    ///
    /// Defines `name` in the current function scope if absent, otherwise
    /// updates the existing slot. Also clears any statement binding of the
    /// same name so the write is immediately visible.
    Assign { name: Name, value: ExprId },

    /// Conditional: `if c { ... } else if c2 { ... } else { ... }`.
    ///
    /// All `if`/`else if` arms belong to one statement; `else_body` is
    /// `StmtRange::EMPTY` when there is no `else`.
    If {
        arms: ArmRange,
        else_body: StmtRange,
    },

    /// Loop: `while cond { ... }`.
    While { cond: ExprId, body: StmtRange },

    /// `break` out of the innermost loop.
    Break,

    /// `continue` with the next iteration of the innermost loop.
    Continue,

    /// Function definition: `fn name(params) { ... }` (top level only).
    FnDef {
        name: Name,
        params: ParamRange,
        body: StmtRange,
    },

    /// `return` / `return expr`; `value` is `ExprId::INVALID` when bare.
    Return { value: ExprId },
}

/// One `if` or `else if` arm: a condition and its block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IfArm {
    pub cond: ExprId,
    pub body: StmtRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_return_uses_sentinel() {
        let stmt = Stmt::new(
            StmtKind::Return {
                value: ExprId::INVALID,
            },
            Span::new(0, 6),
        );
        let StmtKind::Return { value } = stmt.kind else {
            panic!("expected return");
        };
        assert!(!value.is_present());
    }

    #[test]
    fn if_without_else_has_empty_range() {
        let kind = StmtKind::If {
            arms: ArmRange::new(0, 1),
            else_body: StmtRange::EMPTY,
        };
        let StmtKind::If { else_body, .. } = kind else {
            panic!("expected if");
        };
        assert!(else_body.is_empty());
    }
}
