//! Coarse parse of unittest's console summary.
//!
//! Only the `Ran N tests` line and the `FAILED (...)`/`OK` trailer are read,
//! so per-test names and timings are not available. Outcomes are numbered
//! `Test_1`, `Test_2`, ... with passes first.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::TestOutcome;

pub const EXECUTION_TEST_NAME: &str = "Test Execution";
pub const FAILED_TEST_MESSAGE: &str = "Test failed - check implementation";
pub const UNPARSABLE_MESSAGE: &str = "Could not parse test results";
pub const NO_TESTS_MESSAGE: &str = "No tests were executed";
pub const NO_RESULTS_MESSAGE: &str = "No test results available";

fn ran_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Ran (\d+) tests?").expect("valid regex"))
}

fn failures_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"FAILED \(.*?failures=(\d+).*?\)").expect("valid regex"))
}

fn errors_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"FAILED \(.*?errors=(\d+).*?\)").expect("valid regex"))
}

fn capture_count(re: &Regex, text: &str) -> Option<usize> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Turn combined stdout + stderr of a unittest run into outcomes.
///
/// Never returns an empty list: anything unrecognised becomes a single
/// failed `Test Execution` outcome.
pub fn parse_summary(output: &str) -> Vec<TestOutcome> {
    if !output.contains("Ran ") {
        let message = if output.is_empty() {
            NO_TESTS_MESSAGE
        } else {
            output
        };
        return vec![TestOutcome::failed(EXECUTION_TEST_NAME, message)];
    }

    let Some(total) = capture_count(ran_pattern(), output) else {
        return vec![TestOutcome::failed(EXECUTION_TEST_NAME, UNPARSABLE_MESSAGE)];
    };

    let mut outcomes = Vec::new();
    if output.contains("FAILED") || output.contains("ERROR") {
        let failures = capture_count(failures_pattern(), output).unwrap_or(0);
        let errors = capture_count(errors_pattern(), output).unwrap_or(0);
        let failed = failures + errors;
        let passed = total.saturating_sub(failed);
        for i in 0..passed {
            outcomes.push(TestOutcome::passed(format!("Test_{}", i + 1)));
        }
        for i in 0..failed {
            outcomes.push(TestOutcome::failed(
                format!("Test_{}", passed + i + 1),
                FAILED_TEST_MESSAGE,
            ));
        }
    } else if output.contains("OK") {
        for i in 0..total {
            outcomes.push(TestOutcome::passed(format!("Test_{}", i + 1)));
        }
    }

    if outcomes.is_empty() {
        outcomes.push(TestOutcome::failed(EXECUTION_TEST_NAME, NO_RESULTS_MESSAGE));
    }
    outcomes
}
