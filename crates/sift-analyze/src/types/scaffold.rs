use serde::{Deserialize, Serialize};

/// Generated unittest source plus the numbers derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScaffold {
    pub test_code: String,
    /// `def test_` declarations in the generated test section.
    pub test_count: usize,
    /// Generated tests over testable units, as a capped percentage. This is
    /// not measured coverage.
    pub coverage_estimate: f64,
}
