/// Integrity findings over realistic modules.
use sift_analyze::check_integrity;
use sift_core::types::{FindingCategory, Severity};

use crate::common::{fixture, generators};

#[test]
fn test_eval_example() {
    let report = check_integrity("result = eval(user_input)\n");
    let critical: Vec<_> = report
        .findings()
        .filter(|f| f.severity == Severity::Critical)
        .collect();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].category, FindingCategory::DangerousFunction);
    assert_eq!(critical[0].symbol.as_deref(), Some("eval"));
}

#[test]
fn test_insecure_fixture() {
    let report = check_integrity(&fixture("insecure.py"));
    assert!(report.error.is_none());

    let security: Vec<(FindingCategory, Option<u32>, Severity)> = report
        .security_issues
        .iter()
        .map(|f| (f.category, f.line, f.severity))
        .collect();
    assert_eq!(
        security,
        vec![
            (FindingCategory::HardcodedCredential, Some(4), Severity::High),
            (FindingCategory::InjectionRisk, Some(8), Severity::High),
            (FindingCategory::DangerousFunction, Some(14), Severity::Critical),
        ]
    );
    assert_eq!(report.security_issues[0].symbol.as_deref(), Some("DB_PASSWORD"));
    assert_eq!(report.security_issues[1].symbol.as_deref(), Some("lookup"));

    let practices: Vec<FindingCategory> = report
        .best_practice_violations
        .iter()
        .map(|f| f.category)
        .collect();
    assert_eq!(
        practices,
        vec![
            FindingCategory::WildcardImport,
            FindingCategory::MutableDefault,
            FindingCategory::BareExcept,
        ]
    );
    assert_eq!(
        report.best_practice_violations[0].message,
        "Wildcard import from os"
    );
    assert!(report.integrity_issues.is_empty());
}

#[test]
fn test_duplicate_definitions() {
    let source = "def load():\n    pass\n\n\ndef load():\n    pass\n";
    let report = check_integrity(source);
    assert_eq!(report.integrity_issues.len(), 1);
    let finding = &report.integrity_issues[0];
    assert_eq!(finding.category, FindingCategory::DuplicateDefinition);
    assert_eq!(finding.line, Some(5));
    assert_eq!(finding.symbol.as_deref(), Some("load"));
}

#[test]
fn test_clean_module() {
    let report = check_integrity(&fixture("inventory.py"));
    assert!(report.is_clean(), "{report:?}");
}

#[test]
fn test_malformed_input_populates_error() {
    let report = check_integrity(&fixture("broken.py"));
    assert!(report.error.as_deref().unwrap().starts_with("Syntax Error:"));
    assert_eq!(report.findings().count(), 0);
    assert!(!report.is_clean());
}

#[test]
fn test_report_json_shape() {
    let report = check_integrity(&fixture("insecure.py"));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["security_issues"][2]["category"], "dangerous-function");
    assert_eq!(json["security_issues"][2]["severity"], "critical");
    assert!(json.get("error").is_none());
}

#[test]
fn test_pathological_nesting_populates_error() {
    let report = check_integrity(&generators::generate_deep_nesting(10_000));
    assert!(report.error.as_deref().unwrap().starts_with("Syntax Error:"));
    assert_eq!(report.findings().count(), 0);
}
