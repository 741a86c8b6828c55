//! The tree-walking interpreter.
//!
//! Statements execute inside a binding frame: [`Interpreter::exec_stmt`]
//! pushes one, runs the statement, and pops it on every exit path, so
//! `(expr as name)` bindings never outlive their statement. Control flow
//! out of blocks (`break`, `continue`, `return`) travels as [`Flow`]
//! values rather than errors, and unwinds through the same pop sites.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use tern_ir::{
    AstArena, BinaryOp, ExprId, ExprKind, ExprRange, Module, Name, Span, StmtId, StmtKind,
    StmtRange, StringInterner, UnaryOp,
};
use tern_stack::ensure_sufficient_stack;

use crate::builtins::{expected_args, Builtin};
use crate::env::Environment;
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::print::{PrintHandler, SharedPrintHandler};
use crate::value::{FunctionValue, Value};

/// Deepest permitted chain of user function calls.
pub const MAX_CALL_DEPTH: usize = 200;

/// How a statement or block finished.
pub(crate) enum Flow {
    /// Ran to completion; carries the statement's value (`Value::None` for
    /// anything that is not an expression statement).
    Normal(Value),
    Break(Span),
    Continue(Span),
    Return(Value, Span),
}

/// Executes a parsed module against an [`Environment`].
pub struct Interpreter<'a> {
    interner: &'a StringInterner,
    arena: &'a AstArena,
    env: Environment,
    print: SharedPrintHandler,
    call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a AstArena) -> Self {
        Self::with_print_handler(interner, arena, PrintHandler::stdout())
    }

    /// Build an interpreter that sends `print` output to `print`.
    pub fn with_print_handler(
        interner: &'a StringInterner,
        arena: &'a AstArena,
        print: SharedPrintHandler,
    ) -> Self {
        let mut env = Environment::new();
        for &builtin in Builtin::ALL {
            let name = interner.intern(builtin.name());
            env.define_builtin(name, Value::Builtin(builtin));
        }
        Interpreter {
            interner,
            arena,
            env,
            print,
            call_depth: 0,
        }
    }

    /// Run every top-level statement in order.
    ///
    /// Returns the value of the last expression statement, or
    /// [`Value::None`] if the module has none.
    pub fn run(&mut self, module: &Module) -> EvalResult {
        let stmts = self.arena.stmt_list(module.stmts);
        debug!(statements = stmts.len(), "run module");

        let mut last = Value::None;
        for &id in stmts {
            let is_expr = matches!(self.arena.stmt(id).kind, StmtKind::Expr(_));
            match self.exec_stmt(id)? {
                Flow::Normal(value) => {
                    if is_expr {
                        last = value;
                    }
                }
                Flow::Break(span) => {
                    return Err(EvalError::new(EvalErrorKind::BreakOutsideLoop, span));
                }
                Flow::Continue(span) => {
                    return Err(EvalError::new(EvalErrorKind::ContinueOutsideLoop, span));
                }
                Flow::Return(_, span) => {
                    return Err(EvalError::new(EvalErrorKind::ReturnOutsideFunction, span));
                }
            }
        }
        Ok(last)
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub(crate) fn print_handler(&self) -> &PrintHandler {
        &self.print
    }

    /// One binding frame per statement, dropped however the statement ends.
    fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        self.env.push_frame();
        let result = self.exec_stmt_inner(id);
        self.env.pop_frame();
        result
    }

    fn exec_stmt_inner(&mut self, id: StmtId) -> EvalResult<Flow> {
        let stmt = *self.arena.stmt(id);
        match stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                Ok(Flow::Normal(value))
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.assign(name, value);
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::If { arms, else_body } => {
                // Arms share this statement's frame: a binding made in one
                // condition stays visible in every later arm and suite.
                for arm in self.arena.arms(arms) {
                    if self.eval_expr(arm.cond)?.is_truthy() {
                        return self.exec_block(arm.body);
                    }
                }
                self.exec_block(else_body)
            }
            StmtKind::While { cond, body } => {
                loop {
                    // The condition re-evaluates in the loop's own frame,
                    // so header bindings update in place each iteration.
                    if !self.eval_expr(cond)?.is_truthy() {
                        break;
                    }
                    match self.exec_block(body)? {
                        Flow::Normal(_) | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::Break => Ok(Flow::Break(stmt.span)),
            StmtKind::Continue => Ok(Flow::Continue(stmt.span)),
            StmtKind::Return { value } => {
                let result = if value.is_present() {
                    self.eval_expr(value)?
                } else {
                    Value::None
                };
                Ok(Flow::Return(result, stmt.span))
            }
            StmtKind::FnDef { name, params, body } => {
                self.env
                    .assign(name, Value::Function(FunctionValue { name, params, body }));
                Ok(Flow::Normal(Value::None))
            }
        }
    }

    fn exec_block(&mut self, body: StmtRange) -> EvalResult<Flow> {
        for &id in self.arena.stmt_list(body) {
            match self.exec_stmt(id)? {
                Flow::Normal(_) => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal(Value::None))
    }

    fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult {
        let expr = *self.arena.expr(id);
        match expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            ExprKind::Str(name) => Ok(Value::Str(Rc::new(
                self.interner.lookup(name).to_string(),
            ))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ident(name) => self.lookup_name(name, expr.span),
            ExprKind::Binding {
                expr: inner,
                name,
                name_span,
            } => {
                let value = self.eval_expr(inner)?;
                trace!(name = self.interner.lookup(name), "statement binding");
                self.env.bind_statement(name, value.clone(), name_span);
                Ok(value)
            }
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(op, lhs, rhs, expr.span),
            ExprKind::Unary { op, expr: operand } => self.eval_unary(op, operand, expr.span),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),
            ExprKind::Index { target, index } => self.eval_index(target, index, expr.span),
            ExprKind::List { elems } => {
                let ids = self.arena.expr_list(elems);
                let mut items = Vec::with_capacity(ids.len());
                for &elem in ids {
                    items.push(self.eval_expr(elem)?);
                }
                Ok(Value::List(Rc::new(items)))
            }
            ExprKind::Error => Err(EvalError::new(EvalErrorKind::InvalidSyntax, expr.span)),
        }
    }

    fn lookup_name(&self, name: Name, span: Span) -> EvalResult {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value);
        }
        let mut error = EvalError::new(
            EvalErrorKind::UndefinedName {
                name: self.interner.lookup(name).to_string(),
            },
            span,
        );
        if let Some(as_span) = self.env.expired_binding(name) {
            error = error
                .with_related(as_span, "bound here with `as`")
                .with_note("statement bindings last only until the end of their statement");
        }
        Err(error)
    }

    fn eval_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, span: Span) -> EvalResult {
        match op {
            // `and`/`or` yield the deciding operand, not a bool, and skip
            // the right side when the left already decides.
            BinaryOp::And => {
                let left = self.eval_expr(lhs)?;
                if left.is_truthy() {
                    self.eval_expr(rhs)
                } else {
                    Ok(left)
                }
            }
            BinaryOp::Or => {
                let left = self.eval_expr(lhs)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval_expr(rhs)
                }
            }
            _ => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                apply_binary(op, &left, &right, span)
            }
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand_id: ExprId, span: Span) -> EvalResult {
        let operand = self.eval_expr(operand_id)?;
        match (op, &operand) {
            (UnaryOp::Neg, Value::Int(n)) => {
                let negated = n
                    .checked_neg()
                    .ok_or_else(|| overflow_error("-", span))?;
                Ok(Value::Int(negated))
            }
            (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
            (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
            (UnaryOp::Neg, other) => Err(EvalError::new(
                EvalErrorKind::InvalidUnaryOperand {
                    op: "-",
                    operand: other.type_name(),
                },
                span,
            )),
        }
    }

    fn eval_call(&mut self, callee: ExprId, args: ExprRange, span: Span) -> EvalResult {
        let callee_span = self.arena.expr(callee).span;
        let callee_value = self.eval_expr(callee)?;

        let arg_ids = self.arena.expr_list(args);
        let mut arg_values = Vec::with_capacity(arg_ids.len());
        for &arg in arg_ids {
            arg_values.push(self.eval_expr(arg)?);
        }

        match callee_value {
            Value::Function(function) => self.call_function(function, arg_values, span),
            Value::Builtin(builtin) => self.call_builtin(builtin, &arg_values, span),
            other => Err(EvalError::new(
                EvalErrorKind::NotCallable {
                    type_name: other.type_name(),
                },
                callee_span,
            )),
        }
    }

    fn call_function(
        &mut self,
        function: FunctionValue,
        args: Vec<Value>,
        call_span: Span,
    ) -> EvalResult {
        let params = self.arena.params(function.params);
        if params.len() != args.len() {
            return Err(EvalError::new(
                EvalErrorKind::WrongArgCount {
                    name: self.interner.lookup(function.name).to_string(),
                    expected: expected_args(params.len(), Some(params.len())),
                    found: args.len(),
                },
                call_span,
            ));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(EvalError::new(
                EvalErrorKind::RecursionLimit {
                    limit: MAX_CALL_DEPTH,
                },
                call_span,
            ));
        }
        debug!(
            function = self.interner.lookup(function.name),
            depth = self.call_depth,
            "call"
        );

        let locals: FxHashMap<Name, Value> = params.iter().copied().zip(args).collect();
        // The callee starts with an empty overlay; caller frames stay
        // hidden until it returns.
        self.env.push_activation(locals);
        self.call_depth += 1;
        let flow = self.exec_block(function.body);
        self.call_depth -= 1;
        self.env.pop_activation();

        match flow? {
            Flow::Return(value, _) => Ok(value),
            Flow::Normal(_) => Ok(Value::None),
            Flow::Break(span) => Err(EvalError::new(EvalErrorKind::BreakOutsideLoop, span)),
            Flow::Continue(span) => Err(EvalError::new(EvalErrorKind::ContinueOutsideLoop, span)),
        }
    }

    fn eval_index(&mut self, target: ExprId, index: ExprId, span: Span) -> EvalResult {
        let index_span = self.arena.expr(index).span;
        let target_value = self.eval_expr(target)?;
        let index_value = self.eval_expr(index)?;

        match (&target_value, &index_value) {
            (Value::List(items), Value::Int(i)) => match normalize_index(*i, items.len()) {
                Some(idx) => Ok(items[idx].clone()),
                None => Err(EvalError::new(
                    EvalErrorKind::IndexOutOfBounds {
                        index: *i,
                        len: items.len(),
                        type_name: "list",
                    },
                    index_span,
                )),
            },
            (Value::Str(s), Value::Int(i)) => {
                let len = s.chars().count();
                match normalize_index(*i, len).and_then(|idx| s.chars().nth(idx)) {
                    Some(ch) => Ok(Value::Str(Rc::new(ch.to_string()))),
                    None => Err(EvalError::new(
                        EvalErrorKind::IndexOutOfBounds {
                            index: *i,
                            len,
                            type_name: "str",
                        },
                        index_span,
                    )),
                }
            }
            _ => Err(EvalError::new(
                EvalErrorKind::NotIndexable {
                    target: target_value.type_name(),
                    index: index_value.type_name(),
                },
                span,
            )),
        }
    }
}

fn overflow_error(op: &'static str, span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::IntegerOverflow { op }, span)
}

#[allow(clippy::cast_precision_loss)]
fn apply_binary(op: BinaryOp, left: &Value, right: &Value, span: Span) -> EvalResult {
    // Equality works across every type pair and never errors.
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Value::Bool(left != right)),
        _ => {}
    }

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_binary(op, *a, *b, span),
        (Value::Float(a), Value::Float(b)) => float_binary(op, *a, *b, span),
        (Value::Int(a), Value::Float(b)) => float_binary(op, *a as f64, *b, span),
        (Value::Float(a), Value::Int(b)) => float_binary(op, *a, *b as f64, span),
        (Value::Str(a), Value::Str(b)) => str_binary(op, a, b, span),
        (Value::List(a), Value::List(b)) if matches!(op, BinaryOp::Add) => {
            let mut items = a.as_ref().clone();
            items.extend(b.iter().cloned());
            Ok(Value::List(Rc::new(items)))
        }
        _ => Err(EvalError::new(
            EvalErrorKind::InvalidBinaryOperands {
                op: op.as_symbol(),
                lhs: left.type_name(),
                rhs: right.type_name(),
            },
            span,
        )),
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64, span: Span) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::Int(a.checked_add(b).ok_or_else(|| overflow_error("+", span))?),
        BinaryOp::Sub => Value::Int(a.checked_sub(b).ok_or_else(|| overflow_error("-", span))?),
        BinaryOp::Mul => Value::Int(a.checked_mul(b).ok_or_else(|| overflow_error("*", span))?),
        BinaryOp::Div => {
            if b == 0 {
                return Err(EvalError::new(EvalErrorKind::DivisionByZero, span));
            }
            // checked_div still fails on i64::MIN / -1.
            Value::Int(a.checked_div(b).ok_or_else(|| overflow_error("/", span))?)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(EvalError::new(EvalErrorKind::ModuloByZero, span));
            }
            Value::Int(a.checked_rem(b).ok_or_else(|| overflow_error("%", span))?)
        }
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {
            unreachable!("handled before numeric dispatch")
        }
    };
    Ok(value)
}

fn float_binary(op: BinaryOp, a: f64, b: f64, _span: Span) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        // IEEE semantics: dividing by zero yields an infinity or NaN.
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Mod => Value::Float(a % b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {
            unreachable!("handled before numeric dispatch")
        }
    };
    Ok(value)
}

fn str_binary(op: BinaryOp, a: &Rc<String>, b: &Rc<String>, span: Span) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::Str(Rc::new(format!("{a}{b}"))),
        BinaryOp::Lt => Value::Bool(a.as_str() < b.as_str()),
        BinaryOp::LtEq => Value::Bool(a.as_str() <= b.as_str()),
        BinaryOp::Gt => Value::Bool(a.as_str() > b.as_str()),
        BinaryOp::GtEq => Value::Bool(a.as_str() >= b.as_str()),
        _ => {
            return Err(EvalError::new(
                EvalErrorKind::InvalidBinaryOperands {
                    op: op.as_symbol(),
                    lhs: "str",
                    rhs: "str",
                },
                span,
            ))
        }
    };
    Ok(value)
}

/// Map a possibly negative index onto `0..len`; negative indices count
/// from the end.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let adjusted = if index < 0 { index + len } else { index };
    if (0..len).contains(&adjusted) {
        usize::try_from(adjusted).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use tern_diagnostic::ErrorCode;

    use super::*;

    fn run_program(source: &str) -> Result<(Value, String), EvalError> {
        let interner = StringInterner::new();
        let result = tern_parse::parse(source, &interner);
        assert!(
            !result.has_errors(),
            "parse errors in test program: {:?}",
            result.diagnostics
        );
        let print = PrintHandler::buffer();
        let mut interp =
            Interpreter::with_print_handler(&interner, &result.arena, Arc::clone(&print));
        let outcome = interp.run(&result.module);
        assert_eq!(interp.env().frame_depth(), 0, "unbalanced statement frames");
        assert_eq!(interp.env().live_bindings(), 0, "leaked statement bindings");
        outcome.map(|value| (value, print.take_output()))
    }

    fn run_value(source: &str) -> Value {
        match run_program(source) {
            Ok((value, _)) => value,
            Err(error) => panic!("program failed: {error}"),
        }
    }

    fn run_output(source: &str) -> String {
        match run_program(source) {
            Ok((_, output)) => output,
            Err(error) => panic!("program failed: {error}"),
        }
    }

    fn run_error(source: &str) -> EvalError {
        match run_program(source) {
            Ok((value, _)) => panic!("expected an error, got {value}"),
            Err(error) => error,
        }
    }

    fn ints(values: &[i64]) -> Value {
        Value::List(Rc::new(values.iter().copied().map(Value::Int).collect()))
    }

    #[test]
    fn binding_lives_for_rest_of_statement() {
        assert_eq!(run_value("y = (5 as x) + x\ny"), Value::Int(10));
    }

    #[test]
    fn binding_expires_at_statement_end() {
        let error = run_error("y = (5 as x) + 1\nx");
        assert_eq!(error.code(), ErrorCode::E6001);
        assert!(error.related.is_some(), "expected the binding site");
    }

    #[test]
    fn expired_site_points_at_bound_name() {
        let source = "y = (5 as tmp) + 1\ntmp";
        let error = run_error(source);
        let Some((span, _)) = error.related else {
            panic!("expected a related site");
        };
        assert_eq!(&source[span.to_range()], "tmp");
        assert!(!error.notes.is_empty());
    }

    #[test]
    fn plain_undefined_name_has_no_related_site() {
        let error = run_error("foo");
        assert_eq!(error.code(), ErrorCode::E6001);
        assert!(error.related.is_none());
    }

    #[test]
    fn assignment_overrides_binding_and_writes_through() {
        assert_eq!(run_value("x = 1\nx = (10 as x) + x\nx"), Value::Int(20));
    }

    #[test]
    fn binding_shadows_then_restores_outer_value() {
        let source = "x = 100\ny = (1 as x) + x\nz = x\n[y, z]";
        assert_eq!(run_value(source), ints(&[2, 100]));
    }

    #[test]
    fn rebinding_same_name_last_wins() {
        assert_eq!(run_value("(1 as t) + (2 as t) + t"), Value::Int(5));
    }

    #[test]
    fn while_header_rebinds_each_iteration() {
        let source = "i = 0\nsum = 0\nwhile (i as n) < 3 {\n  sum = sum + n\n  i = i + 1\n}\nsum";
        assert_eq!(run_value(source), Value::Int(3));
    }

    #[test]
    fn nested_statement_gets_its_own_frame() {
        let source = "if (1 as a) {\n  b = (2 as a) + a\n  c = a\n}\n[b, c]";
        assert_eq!(run_value(source), ints(&[4, 1]));
    }

    #[test]
    fn if_arms_share_one_binding_window() {
        let source = "r = 0\nif (0 as t) { r = 1 } else if (t == 0 as u) { r = 2 } else { r = 3 }\nr";
        assert_eq!(run_value(source), Value::Int(2));
    }

    #[test]
    fn else_suite_sees_header_binding() {
        let source = "if (0 as t) { r = 1 } else { r = t + 10 }\nr";
        assert_eq!(run_value(source), Value::Int(10));
    }

    #[test]
    fn callee_cannot_see_caller_bindings() {
        let error = run_error("fn probe() { return x }\ny = (1 as x) + probe()");
        assert_eq!(error.code(), ErrorCode::E6001);
    }

    #[test]
    fn callee_still_sees_globals() {
        let source = "g = 5\nfn read_g() { return g }\ny = (1 as g) + read_g()\ny";
        assert_eq!(run_value(source), Value::Int(6));
    }

    #[test]
    fn caller_bindings_survive_a_call() {
        let source = "fn f() { return 10 }\ny = (1 as x) + f() + x\ny";
        assert_eq!(run_value(source), Value::Int(12));
    }

    #[test]
    fn bindings_work_inside_functions() {
        let source = "fn double_sum(a) { return (a * 2 as d) + d }\ndouble_sum(3)";
        assert_eq!(run_value(source), Value::Int(12));
    }

    #[test]
    fn return_discards_binding_frames() {
        let error = run_error("fn f() { return (1 as x) }\nf()\nx");
        assert_eq!(error.code(), ErrorCode::E6001);
    }

    #[test]
    fn module_result_is_last_expression_value() {
        assert_eq!(run_value("1 + 1\nx = 5"), Value::Int(2));
        assert_eq!(run_value("x = 5"), Value::None);
    }

    #[test]
    fn function_without_return_yields_none() {
        assert_eq!(run_value("fn noop() { }\nnoop()"), Value::None);
    }

    #[test]
    fn call_before_definition_fails() {
        let error = run_error("y = probe()\nfn probe() { return 1 }");
        assert_eq!(error.code(), ErrorCode::E6001);
    }

    #[test]
    fn user_function_shadows_builtin() {
        assert_eq!(run_value("fn len(a) { return 42 }\nlen(\"xyz\")"), Value::Int(42));
    }

    #[test]
    fn function_assignment_stays_local() {
        let source = "x = 1\nfn set_local() { x = 99; return x }\ny = set_local()\n[x, y]";
        assert_eq!(run_value(source), ints(&[1, 99]));
    }

    #[test]
    fn nested_calls_and_recursion() {
        let source = "fn add(a, b) { return a + b }\nfn twice(x) { return add(x, x) }\ntwice(4)";
        assert_eq!(run_value(source), Value::Int(8));

        let fib = "fn fib(n) {\n  if n < 2 { return n }\n  return fib(n - 1) + fib(n - 2)\n}\nfib(10)";
        assert_eq!(run_value(fib), Value::Int(55));
    }

    #[test]
    fn while_with_break_and_continue() {
        let source = "total = 0\ni = 0\nwhile true {\n  i = i + 1\n  if i > 5 { break }\n  if i % 2 == 0 { continue }\n  total = total + i\n}\n[i, total]";
        assert_eq!(run_value(source), ints(&[6, 9]));
    }

    #[test]
    fn control_flow_outside_constructs() {
        assert_eq!(run_error("break").code(), ErrorCode::E6007);
        assert_eq!(run_error("continue").code(), ErrorCode::E6007);
        assert_eq!(run_error("return 1").code(), ErrorCode::E6007);
    }

    #[test]
    fn division_and_modulo_by_zero() {
        assert_eq!(run_error("1 / 0").kind, EvalErrorKind::DivisionByZero);
        assert_eq!(run_error("5 % 0").kind, EvalErrorKind::ModuloByZero);
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        let Value::Float(f) = run_value("1.0 / 0.0") else {
            panic!("expected a float");
        };
        assert!(f.is_infinite());
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(run_value("7 / 2"), Value::Int(3));
        assert_eq!(run_value("-7 / 2"), Value::Int(-3));
        assert_eq!(run_value("7 % 3"), Value::Int(1));
    }

    #[test]
    fn mixed_numeric_operands_promote() {
        assert_eq!(run_value("1 + 2.5"), Value::Float(3.5));
        assert_eq!(run_value("2 < 2.5"), Value::Bool(true));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let error = run_error("9223372036854775807 + 1");
        assert_eq!(error.code(), ErrorCode::E6010);
        assert_eq!(run_error("(0 - 9223372036854775807 - 1) * -1").code(), ErrorCode::E6010);
    }

    #[test]
    fn string_operators() {
        let Value::Str(s) = run_value("\"a\" + \"b\"") else {
            panic!("expected a string");
        };
        assert_eq!(s.as_str(), "ab");
        assert_eq!(run_value("\"apple\" < \"banana\""), Value::Bool(true));
    }

    #[test]
    fn list_concat_and_indexing() {
        assert_eq!(run_value("[1] + [2]"), ints(&[1, 2]));
        assert_eq!(run_value("[1, 2, 3][-1]"), Value::Int(3));
        let Value::Str(s) = run_value("\"abc\"[1]") else {
            panic!("expected a string");
        };
        assert_eq!(s.as_str(), "b");
    }

    #[test]
    fn index_out_of_bounds() {
        let error = run_error("[1, 2][5]");
        assert_eq!(
            error.kind,
            EvalErrorKind::IndexOutOfBounds {
                index: 5,
                len: 2,
                type_name: "list"
            }
        );
        assert_eq!(run_error("\"ab\"[-3]").code(), ErrorCode::E6006);
    }

    #[test]
    fn equality_crosses_types_without_error() {
        assert_eq!(run_value("1 == \"a\""), Value::Bool(false));
        assert_eq!(run_value("\"a\" != 1"), Value::Bool(true));
        assert_eq!(run_value("1 == 1.0"), Value::Bool(true));
    }

    #[test]
    fn ordering_mismatched_types_is_an_error() {
        let error = run_error("1 < \"a\"");
        assert_eq!(error.code(), ErrorCode::E6002);
    }

    #[test]
    fn invalid_operand_types() {
        assert_eq!(run_error("1 + \"a\"").code(), ErrorCode::E6002);
        assert_eq!(run_error("-\"a\"").code(), ErrorCode::E6002);
        assert_eq!(run_error("true[0]").code(), ErrorCode::E6002);
    }

    #[test]
    fn calling_a_non_function() {
        let error = run_error("x = 3\nx()");
        assert_eq!(error.kind, EvalErrorKind::NotCallable { type_name: "int" });
    }

    #[test]
    fn wrong_argument_count() {
        let error = run_error("fn f(a) { return a }\nf(1, 2)");
        assert_eq!(
            error.kind,
            EvalErrorKind::WrongArgCount {
                name: "f".to_string(),
                expected: "1 argument".to_string(),
                found: 2
            }
        );
    }

    #[test]
    fn recursion_limit_trips() {
        let error = run_error("fn f() { return f() }\nf()");
        assert_eq!(
            error.kind,
            EvalErrorKind::RecursionLimit {
                limit: MAX_CALL_DEPTH
            }
        );
    }

    #[test]
    fn short_circuit_skips_right_side() {
        assert_eq!(
            run_value("fn boom() { return 1 / 0 }\nfalse and boom()"),
            Value::Bool(false)
        );
        assert_eq!(run_value("none or 7"), Value::Int(7));
        assert_eq!(run_value("3 and 4"), Value::Int(4));
    }

    #[test]
    fn truthiness_drives_conditionals() {
        let source = "r = 0\nif \"\" { r = 1 }\nif [] { r = r + 2 }\nif 0.0 { r = r + 4 }\nif \"x\" { r = r + 8 }\nr";
        assert_eq!(run_value(source), Value::Int(8));
    }

    #[test]
    fn not_negates_truthiness() {
        assert_eq!(run_value("not \"\""), Value::Bool(true));
        assert_eq!(run_value("not 3"), Value::Bool(false));
    }

    #[test]
    fn print_joins_arguments_plainly() {
        assert_eq!(run_output("print(1, \"two\", [3])"), "1 two [3]\n");
        assert_eq!(run_output("print()"), "\n");
    }

    #[test]
    fn builtin_conversions() {
        assert_eq!(run_value("int(\"42\")"), Value::Int(42));
        assert_eq!(run_value("int(3.9)"), Value::Int(3));
        assert_eq!(run_value("int(true)"), Value::Int(1));
        assert_eq!(run_value("float(\"2.5\")"), Value::Float(2.5));
        assert_eq!(run_error("int(\"x\")").code(), ErrorCode::E6009);

        let Value::Str(s) = run_value("str(1.5)") else {
            panic!("expected a string");
        };
        assert_eq!(s.as_str(), "1.5");
        let Value::Str(s) = run_value("str(none)") else {
            panic!("expected a string");
        };
        assert_eq!(s.as_str(), "none");
    }

    #[test]
    fn builtin_len_counts_chars_and_elements() {
        assert_eq!(run_value("len(\"h\u{e9}llo\")"), Value::Int(5));
        assert_eq!(run_value("len([1, 2, 3])"), Value::Int(3));
        assert_eq!(run_error("len(1)").code(), ErrorCode::E6009);
    }

    #[test]
    fn builtin_abs_and_find_and_range() {
        assert_eq!(run_value("abs(-5)"), Value::Int(5));
        assert_eq!(run_value("abs(-2.5)"), Value::Float(2.5));
        assert_eq!(run_value("find(\"hello\", \"ll\")"), Value::Int(2));
        assert_eq!(run_value("find(\"hello\", \"z\")"), Value::Int(-1));
        assert_eq!(run_value("find([1, 2, 3], 2)"), Value::Int(1));
        assert_eq!(run_value("range(3)"), ints(&[0, 1, 2]));
        assert_eq!(run_value("range(2, 5)"), ints(&[2, 3, 4]));
    }

    #[test]
    fn poison_nodes_fail_cleanly() {
        let interner = StringInterner::new();
        let result = tern_parse::parse("x = $ + 1", &interner);
        assert!(result.has_errors());

        let mut interp =
            Interpreter::with_print_handler(&interner, &result.arena, PrintHandler::silent());
        let Err(error) = interp.run(&result.module) else {
            panic!("expected evaluation to fail");
        };
        assert_eq!(error.kind, EvalErrorKind::InvalidSyntax);
        assert_eq!(error.code(), ErrorCode::E1002);
    }
}
