//! Sandboxed execution of Python sources.
//!
//! Each call writes the source to its own temp file, runs the interpreter in
//! a fresh process group with a scrubbed environment, and enforces a
//! wall-clock timeout by killing the whole group. Isolation is the OS process
//! boundary; containers or seccomp are a deployment concern.

pub mod executor;
pub mod memory;
pub mod summary;
pub mod types;

pub use executor::{execute, run_generated_tests, ExecError, Executor};
pub use types::{ExecutionResult, TestOutcome};
