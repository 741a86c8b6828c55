//! Arena storage for AST nodes.
//!
//! All expressions and statements for one module live in a single
//! [`AstArena`]; nodes refer to each other through the id types in
//! [`super::ids`]. Child lists (call arguments, block bodies, `if` arms,
//! parameter names) are flattened into side tables addressed by ranges.

use super::expr::Expr;
use super::ids::{ArmRange, ExprId, ExprRange, ParamRange, StmtId, StmtRange};
use super::stmt::{IfArm, Stmt};
use crate::Name;

/// Convert a length to u32, panicking with context on overflow.
fn to_u32(n: usize, what: &str) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("too many {what}: {n} exceeds u32 range"))
}

/// Convert a length to u16, panicking with context on overflow.
fn to_u16(n: usize, what: &str) -> u16 {
    u16::try_from(n).unwrap_or_else(|_| panic!("too many {what}: {n} exceeds u16 range"))
}

/// Arena for one parsed module.
#[derive(Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    /// Flattened expression id lists (call args, list elements).
    expr_lists: Vec<ExprId>,
    /// Flattened statement id lists (blocks, top level).
    stmt_lists: Vec<StmtId>,
    /// `if`/`else if` arms.
    arms: Vec<IfArm>,
    /// Function parameter names.
    params: Vec<Name>,
}

impl AstArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena pre-allocated based on source length.
    ///
    /// Heuristic: roughly one expression per 16 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 16;
        Self {
            exprs: Vec::with_capacity(estimated),
            stmts: Vec::with_capacity(estimated / 4),
            expr_lists: Vec::new(),
            stmt_lists: Vec::new(),
            arms: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Allocate an expression, returning its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len(), "expressions"));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by id.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Allocate a statement, returning its id.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len(), "statements"));
        self.stmts.push(stmt);
        id
    }

    /// Get a statement by id.
    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Flatten a list of expression ids into the side table.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        let len = to_u16(ids.len(), "expressions in one list");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, len)
    }

    /// Get the expression ids for a range.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.start as usize..range.start as usize + range.len()]
    }

    /// Flatten a list of statement ids into the side table.
    pub fn alloc_stmt_list(&mut self, ids: &[StmtId]) -> StmtRange {
        let start = to_u32(self.stmt_lists.len(), "statement list entries");
        let len = to_u16(ids.len(), "statements in one block");
        self.stmt_lists.extend_from_slice(ids);
        StmtRange::new(start, len)
    }

    /// Get the statement ids for a range.
    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.start as usize..range.start as usize + range.len()]
    }

    /// Store `if`/`else if` arms.
    pub fn alloc_arms(&mut self, arms: &[IfArm]) -> ArmRange {
        let start = to_u32(self.arms.len(), "if arms");
        let len = to_u16(arms.len(), "arms in one if");
        self.arms.extend_from_slice(arms);
        ArmRange::new(start, len)
    }

    /// Get the arms for a range.
    #[inline]
    pub fn arms(&self, range: ArmRange) -> &[IfArm] {
        &self.arms[range.start as usize..range.start as usize + range.len()]
    }

    /// Store function parameter names.
    pub fn alloc_params(&mut self, names: &[Name]) -> ParamRange {
        let start = to_u32(self.params.len(), "parameters");
        let len = to_u16(names.len(), "parameters in one function");
        self.params.extend_from_slice(names);
        ParamRange::new(start, len)
    }

    /// Get the parameter names for a range.
    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Name] {
        &self.params[range.start as usize..range.start as usize + range.len()]
    }

    /// Number of expressions allocated.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Number of statements allocated.
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}
