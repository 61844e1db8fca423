use serde::{Deserialize, Serialize};

/// Outcome of one interpreter run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code 0 within the timeout.
    pub success: bool,
    /// Captured stdout.
    pub output: String,
    /// Captured stderr when non-empty, or the failure/timeout message.
    pub error: Option<String>,
    /// Wall-clock seconds, including runs that timed out.
    pub execution_time: f64,
    /// Resident memory growth of the calling process in MB, floored at 0.
    /// This does not measure the child; see `child_peak_memory`.
    pub memory_usage: f64,
    /// Peak resident memory of the interpreter process in MB, when sampled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub child_peak_memory: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub timed_out: bool,
    /// stdout or stderr hit the capture limit.
    #[serde(default)]
    pub output_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub test_results: Option<Vec<TestOutcome>>,
}

impl ExecutionResult {
    /// A run that never produced a process result (missing interpreter,
    /// temp file or spawn failure).
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message.into()),
            execution_time: 0.0,
            memory_usage: 0.0,
            child_peak_memory: None,
            exit_code: None,
            timed_out: false,
            output_truncated: false,
            test_results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub test_name: String,
    pub passed: bool,
    pub error_message: Option<String>,
    pub execution_time: f64,
}

impl TestOutcome {
    pub fn passed(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            passed: true,
            error_message: None,
            execution_time: 0.0,
        }
    }

    pub fn failed(test_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            passed: false,
            error_message: Some(message.into()),
            execution_time: 0.0,
        }
    }
}
