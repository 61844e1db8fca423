/// Test scaffold generation over realistic modules.
use sift_analyze::scaffold::count_test_functions;
use sift_analyze::{analyze, build_scaffold, generate_tests};
use sift_core::types::DifficultyTier;

use crate::common::{fixture, generators};

const TIERS: [DifficultyTier; 3] = [DifficultyTier::Low, DifficultyTier::Mid, DifficultyTier::High];

#[test]
fn test_budget_is_never_exceeded() {
    let sources = [
        // zero testable units
        "x = 1\n".to_string(),
        // one
        "def only(value):\n    return value\n".to_string(),
        // more than any budget
        generators::generate_functions(40, 5),
        generators::generate_classes(10, 4),
        fixture("inventory.py"),
    ];
    for source in &sources {
        let analysis = analyze(source).unwrap();
        for budget in [0, 5, 15, 25] {
            let code = generate_tests(source, &analysis, budget);
            let declared = count_test_functions(&code);
            assert!(declared <= budget, "{declared} tests for budget {budget}");
        }
    }
}

#[test]
fn test_tiers_fill_their_budget_on_large_inputs() {
    let source = generators::generate_functions(40, 5);
    let analysis = analyze(&source).unwrap();
    for tier in TIERS {
        let scaffold = build_scaffold(&source, &analysis, tier.test_budget());
        assert_eq!(scaffold.test_count, tier.test_budget());
    }
}

#[test]
fn test_classes_take_budget_before_functions() {
    let mut source = generators::generate_functions(3, 5);
    source.push_str(&generators::generate_classes(2, 4));
    let analysis = analyze(&source).unwrap();

    let code = generate_tests(&source, &analysis, DifficultyTier::Low.test_budget());
    assert!(code.contains("class TestService0(unittest.TestCase):"));
    assert!(code.contains("class TestService1(unittest.TestCase):"));
    assert!(!code.contains("class TestFunctions(unittest.TestCase):"));
    assert_eq!(count_test_functions(&code), 5);
}

#[test]
fn test_inventory_scaffold() {
    let source = fixture("inventory.py");
    let analysis = analyze(&source).unwrap();
    let scaffold = build_scaffold(&source, &analysis, DifficultyTier::Low.test_budget());

    assert_eq!(scaffold.test_count, 4);
    let expected = 4.0 / 6.0 * 100.0;
    assert!((scaffold.coverage_estimate - expected).abs() < 1e-9);

    let code = &scaffold.test_code;
    assert!(code.starts_with("import unittest\n"));
    assert!(code.contains("import json\n"));
    assert!(code.contains("from collections import OrderedDict\n"));
    assert!(code.contains(&source));
    for test in ["test_add", "test_total", "test_export", "test_restock"] {
        assert!(code.contains(&format!("def {test}(self):")), "missing {test}");
    }
    assert!(!code.contains("def test__reset"));
    assert!(!code.contains("def test___init__"));
    assert!(code.trim_end().ends_with("unittest.main()"));
}
