//! The tern evaluator.
//!
//! [`Interpreter`] walks the arena AST from `tern_parse` and runs it
//! directly; there is no lowering step. Names resolve through
//! [`Environment`], which layers `(expr as name)` statement bindings over
//! function locals, globals, and builtins. Output from `print` routes
//! through a [`PrintHandler`] so embedders and tests can capture it.
//!
//! ```
//! use tern_eval::{Interpreter, Value};
//! use tern_ir::StringInterner;
//!
//! let interner = StringInterner::new();
//! let parsed = tern_parse::parse("(2 as n) * n", &interner);
//! assert!(!parsed.has_errors());
//!
//! let mut interp = Interpreter::new(&interner, &parsed.arena);
//! let value = interp.run(&parsed.module)?;
//! assert_eq!(value, Value::Int(4));
//! # Ok::<(), tern_eval::EvalError>(())
//! ```

mod builtins;
mod env;
mod error;
mod interpreter;
mod print;
mod value;

pub use builtins::Builtin;
pub use env::Environment;
pub use error::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use print::{PrintHandler, SharedPrintHandler};
pub use value::{FunctionValue, Value};
