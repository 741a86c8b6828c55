//! Tern IR - core data structures shared across the interpreter.
//!
//! This crate contains the types every other compiler crate builds on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens produced by the lexer
//! - AST nodes (Expr, Stmt) and their arena
//!
//! # Design
//!
//! - **Intern identifiers**: strings become `Name(u32)`, so name comparison
//!   in the evaluator's scope maps is an integer compare.
//! - **Flatten the AST**: no `Box<Expr>`; nodes live in an [`AstArena`] and
//!   refer to each other by `ExprId`/`StmtId` indices.
//!
//! Float literals are stored as `u64` bits so every node type is `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    ArmRange, AstArena, BinaryOp, Expr, ExprId, ExprKind, ExprRange, IfArm, Module, ParamRange,
    Stmt, StmtId, StmtKind, StmtRange, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind};
