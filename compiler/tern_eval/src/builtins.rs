//! Built-in functions.
//!
//! The registry is a fixed enum rather than a table of closures; dispatch
//! lives on [`Interpreter`] so `print` can reach the output handler.

use std::rc::Rc;

use tern_ir::Span;

use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Longest list `range` will produce.
const MAX_RANGE_LEN: i64 = 1_000_000;

/// Functions available to every program without a definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Len,
    Str,
    Int,
    Float,
    Abs,
    Find,
    Range,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Print,
        Builtin::Len,
        Builtin::Str,
        Builtin::Int,
        Builtin::Float,
        Builtin::Abs,
        Builtin::Find,
        Builtin::Range,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Len => "len",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Abs => "abs",
            Builtin::Find => "find",
            Builtin::Range => "range",
        }
    }

    /// Accepted argument counts as `(min, max)`; `None` means unbounded.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            Builtin::Print => (0, None),
            Builtin::Len | Builtin::Str | Builtin::Int | Builtin::Float | Builtin::Abs => {
                (1, Some(1))
            }
            Builtin::Find => (2, Some(2)),
            Builtin::Range => (1, Some(2)),
        }
    }
}

impl Interpreter<'_> {
    pub(crate) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        check_arity(builtin, args.len(), span)?;
        match builtin {
            Builtin::Print => {
                let line = args
                    .iter()
                    .map(Value::to_plain_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.print_handler().print_line(&line);
                Ok(Value::None)
            }
            Builtin::Len => len_builtin(&args[0], span),
            Builtin::Str => Ok(Value::Str(Rc::new(args[0].to_plain_string()))),
            Builtin::Int => int_builtin(&args[0], span),
            Builtin::Float => float_builtin(&args[0], span),
            Builtin::Abs => abs_builtin(&args[0], span),
            Builtin::Find => find_builtin(&args[0], &args[1], span),
            Builtin::Range => range_builtin(args, span),
        }
    }
}

fn check_arity(builtin: Builtin, found: usize, span: Span) -> Result<(), EvalError> {
    let (min, max) = builtin.arity();
    let ok = match max {
        Some(max) => found >= min && found <= max,
        None => found >= min,
    };
    if ok {
        return Ok(());
    }
    Err(EvalError::new(
        EvalErrorKind::WrongArgCount {
            name: builtin.name().to_string(),
            expected: expected_args(min, max),
            found,
        },
        span,
    ))
}

/// Human-readable argument count for [`EvalErrorKind::WrongArgCount`].
pub(crate) fn expected_args(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if max == min => {
            if min == 1 {
                "1 argument".to_string()
            } else {
                format!("{min} arguments")
            }
        }
        Some(max) => format!("{min} to {max} arguments"),
        None => format!("at least {min} arguments"),
    }
}

fn invalid_arg(builtin: &'static str, message: String, span: Span) -> EvalResult {
    Err(EvalError::new(
        EvalErrorKind::InvalidBuiltinArg { builtin, message },
        span,
    ))
}

/// Clamp a host-side length into the value space.
fn as_index(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn len_builtin(value: &Value, span: Span) -> EvalResult {
    match value {
        Value::Str(s) => Ok(Value::Int(as_index(s.chars().count()))),
        Value::List(items) => Ok(Value::Int(as_index(items.len()))),
        other => invalid_arg(
            "len",
            format!("expected str or list, found {}", other.type_name()),
            span,
        ),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn int_builtin(value: &Value, span: Span) -> EvalResult {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(f) => {
            let truncated = f.trunc();
            let limit = 2f64.powi(63);
            if f.is_finite() && truncated >= -limit && truncated < limit {
                Ok(Value::Int(truncated as i64))
            } else {
                invalid_arg("int", format!("{value} does not fit in an integer"), span)
            }
        }
        Value::Str(s) => match s.trim().parse::<i64>() {
            Ok(n) => Ok(Value::Int(n)),
            Err(_) => invalid_arg("int", format!("cannot parse {value} as an integer"), span),
        },
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => invalid_arg(
            "int",
            format!(
                "expected a number, string, or bool, found {}",
                other.type_name()
            ),
            span,
        ),
    }
}

#[allow(clippy::cast_precision_loss)]
fn float_builtin(value: &Value, span: Span) -> EvalResult {
    match value {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Str(s) => match s.trim().parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(_) => invalid_arg("float", format!("cannot parse {value} as a float"), span),
        },
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        other => invalid_arg(
            "float",
            format!(
                "expected a number, string, or bool, found {}",
                other.type_name()
            ),
            span,
        ),
    }
}

fn abs_builtin(value: &Value, span: Span) -> EvalResult {
    match value {
        Value::Int(n) => match n.checked_abs() {
            Some(v) => Ok(Value::Int(v)),
            None => Err(EvalError::new(
                EvalErrorKind::IntegerOverflow { op: "abs" },
                span,
            )),
        },
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => invalid_arg(
            "abs",
            format!("expected a number, found {}", other.type_name()),
            span,
        ),
    }
}

fn find_builtin(haystack: &Value, needle: &Value, span: Span) -> EvalResult {
    match (haystack, needle) {
        (Value::Str(h), Value::Str(n)) => {
            // Report the match position in characters, not bytes.
            let index = h
                .find(n.as_str())
                .map_or(-1, |byte| as_index(h[..byte].chars().count()));
            Ok(Value::Int(index))
        }
        (Value::List(items), needle) => {
            let index = items
                .iter()
                .position(|item| item == needle)
                .map_or(-1, as_index);
            Ok(Value::Int(index))
        }
        _ => invalid_arg(
            "find",
            format!(
                "cannot search {} for {}",
                haystack.type_name(),
                needle.type_name()
            ),
            span,
        ),
    }
}

fn range_builtin(args: &[Value], span: Span) -> EvalResult {
    let (start, end) = match args {
        [Value::Int(end)] => (0, *end),
        [Value::Int(start), Value::Int(end)] => (*start, *end),
        _ => {
            return invalid_arg("range", "expected integer bounds".to_string(), span);
        }
    };
    let count = end.saturating_sub(start).max(0);
    if count > MAX_RANGE_LEN {
        return invalid_arg(
            "range",
            format!("range of {count} elements exceeds the limit of {MAX_RANGE_LEN}"),
            span,
        );
    }
    let items: Vec<Value> = (start..end).map(Value::Int).collect();
    Ok(Value::List(Rc::new(items)))
}
