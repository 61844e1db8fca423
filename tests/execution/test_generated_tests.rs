/// Generated tests executed end to end.
use sift_analyze::{analyze, generate_tests};
use sift_core::types::DifficultyTier;
use sift_exec::run_generated_tests;

use crate::common::fixture;

#[tokio::test]
async fn test_inventory_scaffold_passes() {
    require_python!();
    let source = fixture("inventory.py");
    let analysis = analyze(&source).unwrap();
    let code = generate_tests(&source, &analysis, DifficultyTier::Low.test_budget());

    let outcomes = run_generated_tests(&code).await;
    assert_eq!(outcomes.len(), 4, "{outcomes:?}");
    assert!(outcomes.iter().all(|o| o.passed), "{outcomes:?}");
    assert_eq!(outcomes[0].test_name, "Test_1");
}

#[tokio::test]
async fn test_failures_are_tallied() {
    require_python!();
    let code = r#"
import unittest

class TestMixed(unittest.TestCase):
    def test_ok(self):
        self.assertTrue(True)

    def test_fail(self):
        self.assertEqual(1, 2)

    def test_error(self):
        raise KeyError("x")

if __name__ == '__main__':
    unittest.main()
"#;
    let outcomes = run_generated_tests(code).await;
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.iter().filter(|o| o.passed).count(), 1);
    assert!(outcomes[1..].iter().all(|o| o.error_message.is_some()));
}

#[tokio::test]
async fn test_output_without_summary_is_one_failure() {
    require_python!();
    let outcomes = run_generated_tests("print('no tests here')\n").await;
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].passed);
    assert_eq!(outcomes[0].error_message.as_deref(), Some("no tests here\n"));
}
