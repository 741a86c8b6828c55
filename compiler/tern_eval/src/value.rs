//! Runtime values.
//!
//! Strings and lists share their storage through `Rc`, so cloning a value
//! during binding or assignment never copies the payload. Numbers compare
//! across `Int`/`Float`, matching the `==` operator of the language.

use std::fmt;
use std::rc::Rc;

use tern_ir::{Name, ParamRange, StmtRange};

use crate::builtins::Builtin;

/// A tern runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<String>),
    List(Rc<Vec<Value>>),
    None,
    /// A user function defined with `fn`.
    Function(FunctionValue),
    /// A built-in function such as `print` or `len`.
    Builtin(Builtin),
}

/// A user-defined function. Body and parameters live in the AST arena, so
/// the value itself is just a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionValue {
    pub name: Name,
    pub params: ParamRange,
    pub body: StmtRange,
}

impl Value {
    /// Truthiness: `false`, `none`, `0`, `0.0`, `""`, and `[]` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::None => false,
            Value::Function(_) | Value::Builtin(_) => true,
        }
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::None => "none",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Render the value the way `print` and `str()` show it: strings are
    /// unquoted at the top level but quoted inside lists.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Str(s) => s.as_str().to_string(),
            other => other.to_string(),
        }
    }
}

/// Format a float so it always reads as one: `1.0` rather than `1`.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::None => write!(f, "none"),
            Value::Function(_) => write!(f, "<function>"),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name()),
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}
