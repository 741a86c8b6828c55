//! End-to-end runs through the driver.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use tern_diagnostic::ErrorCode;
use tern_eval::{PrintHandler, Value};
use ternc::{run_source, RunOutcome};

fn buffered(source: &str) -> (RunOutcome, String) {
    let print = PrintHandler::buffer();
    let outcome = run_source(source, Arc::clone(&print));
    let output = print.take_output();
    (outcome, output)
}

#[test]
fn runs_a_program_and_captures_print() {
    let source = "fn greet(name) { print(\"hi\", name) }\ngreet(\"tern\")\n1 + 2";
    let (outcome, output) = buffered(source);
    assert!(!outcome.has_errors());
    assert_eq!(outcome.value, Some(Value::Int(3)));
    assert_eq!(output, "hi tern\n");
}

#[test]
fn statement_binding_end_to_end() {
    let (outcome, _) = buffered("total = (2 as n) * n + n\ntotal");
    assert_eq!(outcome.value, Some(Value::Int(6)));
}

#[test]
fn parse_errors_block_evaluation() {
    let (outcome, output) = buffered("x = (1 as 42)\nprint(\"never\")");
    assert!(outcome.has_errors());
    assert!(outcome.value.is_none());
    assert_eq!(output, "", "evaluation must not start");
}

#[test]
fn warnings_do_not_block_evaluation() {
    let (outcome, _) = buffered("y = (1 as t) + (2 as t)\ny");
    assert!(!outcome.has_errors());
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::W1001));
    assert_eq!(outcome.value, Some(Value::Int(3)));
}

#[test]
fn runtime_error_becomes_a_diagnostic() {
    let (outcome, _) = buffered("1 / 0");
    assert!(outcome.has_errors());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E6003);
}

#[test]
fn expired_binding_diagnostic_shows_both_sites() {
    let (outcome, _) = buffered("y = (5 as tmp) + 1\ntmp");
    assert!(outcome.has_errors());
    let diag = &outcome.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.labels.len(), 2);
}

#[test]
fn output_flushes_before_a_runtime_error() {
    let (outcome, output) = buffered("print(\"first\")\n1 / 0");
    assert!(outcome.has_errors());
    assert_eq!(output, "first\n");
}
