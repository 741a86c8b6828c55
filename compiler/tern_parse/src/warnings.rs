//! Post-parse lint: the same name bound twice within one statement.
//!
//! Bindings live until the end of the statement that introduced them, and
//! the arms of an `if`/`else if` chain count as one statement. Binding a
//! name a second time in that window silently overwrites the first value,
//! which is almost always a typo, so it gets a warning. Statements nested
//! inside a block start their own window and are scanned separately.

use rustc_hash::FxHashMap;
use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{
    AstArena, ExprId, ExprKind, Module, Name, Span, StmtId, StmtKind, StmtRange, StringInterner,
};
use tern_stack::ensure_sufficient_stack;

pub(crate) fn scan_duplicate_bindings(
    module: &Module,
    arena: &AstArena,
    interner: &StringInterner,
) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();
    scan_stmt_range(module.stmts, arena, interner, &mut warnings);
    warnings
}

fn scan_stmt_range(
    range: StmtRange,
    arena: &AstArena,
    interner: &StringInterner,
    warnings: &mut Vec<Diagnostic>,
) {
    for &stmt in arena.stmt_list(range) {
        scan_stmt(stmt, arena, interner, warnings);
    }
}

fn scan_stmt(
    stmt: StmtId,
    arena: &AstArena,
    interner: &StringInterner,
    warnings: &mut Vec<Diagnostic>,
) {
    // Bindings seen so far in this statement's window.
    let mut seen: FxHashMap<Name, Span> = FxHashMap::default();

    match arena.stmt(stmt).kind {
        StmtKind::Expr(expr) => collect(expr, arena, interner, &mut seen, warnings),
        StmtKind::Assign { value, .. } => collect(value, arena, interner, &mut seen, warnings),
        StmtKind::If { arms, else_body } => {
            // Every arm condition shares the chain's window; the suites
            // are ordinary nested statements.
            for arm in arena.arms(arms) {
                collect(arm.cond, arena, interner, &mut seen, warnings);
                scan_stmt_range(arm.body, arena, interner, warnings);
            }
            scan_stmt_range(else_body, arena, interner, warnings);
        }
        StmtKind::While { cond, body } => {
            collect(cond, arena, interner, &mut seen, warnings);
            scan_stmt_range(body, arena, interner, warnings);
        }
        StmtKind::Return { value } => {
            if value.is_present() {
                collect(value, arena, interner, &mut seen, warnings);
            }
        }
        StmtKind::FnDef { body, .. } => scan_stmt_range(body, arena, interner, warnings),
        StmtKind::Break | StmtKind::Continue => {}
    }
}

fn collect(
    expr: ExprId,
    arena: &AstArena,
    interner: &StringInterner,
    seen: &mut FxHashMap<Name, Span>,
    warnings: &mut Vec<Diagnostic>,
) {
    ensure_sufficient_stack(|| match arena.expr(expr).kind {
        ExprKind::Binding {
            expr: inner,
            name,
            name_span,
        } => {
            // Visit the bound expression first: it evaluates before the
            // binding takes effect.
            collect(inner, arena, interner, seen, warnings);
            if let Some(first) = seen.insert(name, name_span) {
                warnings.push(
                    Diagnostic::warning(ErrorCode::W1001)
                        .with_message(format!(
                            "`{}` is bound more than once in this statement",
                            interner.lookup(name)
                        ))
                        .with_label(name_span, "bound again here")
                        .with_secondary_label(first, "first bound here")
                        .with_note(
                            "the later binding replaces the earlier value for the rest of the statement",
                        ),
                );
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            collect(lhs, arena, interner, seen, warnings);
            collect(rhs, arena, interner, seen, warnings);
        }
        ExprKind::Unary { expr: operand, .. } => {
            collect(operand, arena, interner, seen, warnings);
        }
        ExprKind::Call { callee, args } => {
            collect(callee, arena, interner, seen, warnings);
            for &arg in arena.expr_list(args) {
                collect(arg, arena, interner, seen, warnings);
            }
        }
        ExprKind::Index { target, index } => {
            collect(target, arena, interner, seen, warnings);
            collect(index, arena, interner, seen, warnings);
        }
        ExprKind::List { elems } => {
            for &elem in arena.expr_list(elems) {
                collect(elem, arena, interner, seen, warnings);
            }
        }
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::None
        | ExprKind::Ident(_)
        | ExprKind::Error => {}
    });
}

#[cfg(test)]
mod tests {
    use tern_ir::StringInterner;

    fn warning_codes(source: &str) -> Vec<&'static str> {
        let interner = StringInterner::new();
        let result = crate::parse(source, &interner);
        result
            .diagnostics
            .iter()
            .filter(|d| !d.is_error())
            .map(|d| d.code.as_str())
            .collect()
    }

    #[test]
    fn duplicate_binding_in_one_statement_warns() {
        let codes = warning_codes("y = (a() as t) + (b() as t)");
        assert_eq!(codes, vec!["W1001"]);
    }

    #[test]
    fn distinct_names_do_not_warn() {
        let codes = warning_codes("y = (a() as s) + (b() as t)");
        assert!(codes.is_empty());
    }

    #[test]
    fn if_chain_conditions_share_one_window() {
        let codes = warning_codes("if (p() as t) { 1 } else if (q() as t) { 2 }");
        assert_eq!(codes, vec!["W1001"]);
    }

    #[test]
    fn nested_statement_starts_fresh_window() {
        // The loop body is its own statement, so re-using the header's
        // name there is fine.
        let codes = warning_codes("while (n() as t) { x = (m() as t) }");
        assert!(codes.is_empty());
    }

    #[test]
    fn triple_binding_warns_twice() {
        let codes = warning_codes("y = (a() as t) + (b() as t) + (c() as t)");
        assert_eq!(codes, vec!["W1001", "W1001"]);
    }

    #[test]
    fn warning_labels_both_sites() {
        let interner = StringInterner::new();
        let result = crate::parse("y = (a() as t) + (b() as t)", &interner);
        let warning = result
            .diagnostics
            .iter()
            .find(|d| !d.is_error())
            .unwrap_or_else(|| panic!("expected a warning"));
        assert!(warning.labels.iter().any(|l| l.is_primary));
        assert!(warning.labels.iter().any(|l| !l.is_primary));
        assert!(warning.message.contains("`t`"));
    }
}
