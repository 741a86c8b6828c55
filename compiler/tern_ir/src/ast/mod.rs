//! AST nodes and their arena.

mod arena;
mod expr;
mod ids;
mod operators;
mod stmt;

pub use arena::AstArena;
pub use expr::{Expr, ExprKind};
pub use ids::{ArmRange, ExprId, ExprRange, ParamRange, StmtId, StmtRange};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{IfArm, Stmt, StmtKind};

/// A parsed source file: its top-level statements.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    pub stmts: StmtRange,
}

impl Module {
    pub fn new(stmts: StmtRange) -> Self {
        Module { stmts }
    }
}
