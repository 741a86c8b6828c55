//! Driver for the tern interpreter.
//!
//! The library side carries the pipeline: [`run_source`] parses a program
//! and evaluates it when the parse is clean, collecting every diagnostic
//! along the way. Integration tests and embedders use it directly; the
//! `tern` binary layers argv handling, terminal rendering, and exit codes
//! on top through [`commands`].

pub mod commands;

mod driver;

pub use driver::{run_source, RunOutcome};
