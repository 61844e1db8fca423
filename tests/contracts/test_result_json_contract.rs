/// Contract tests for the JSON shapes handed to the orchestration layer.
///
/// Field names here are read by callers that persist results, so renames
/// must be deliberate.
use sift_analyze::{analyze, build_scaffold, check_integrity, profile};
use sift_core::types::SyntaxError;
use sift_engine::{AnalysisOutcome, EvaluationReport};
use sift_exec::{ExecutionResult, TestOutcome};

use crate::common::fixture;

fn keys(value: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

#[test]
fn analysis_json_fields() {
    let analysis = analyze(&fixture("inventory.py")).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(
        keys(&json),
        vec![
            "classes",
            "complexity",
            "functions",
            "imports",
            "issues",
            "lines_of_code",
            "variables"
        ]
    );
    let add = &json["functions"][1];
    assert_eq!(add["name"], "add");
    assert_eq!(add["parameters"], serde_json::json!(["self", "name", "count"]));
    assert_eq!(add["complexity"], 2);
}

#[test]
fn syntax_error_json_fields() {
    let err = analyze(&fixture("broken.py")).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert!(json["message"].is_string());
    assert_eq!(json["line"], 5);
    assert!(json["column"].is_number());

    let positionless = serde_json::to_value(SyntaxError::new("bad")).unwrap();
    assert_eq!(positionless["message"], "bad");
}

#[test]
fn profile_json_fields() {
    let json = serde_json::to_value(profile(&fixture("loops.py"))).unwrap();
    assert_eq!(
        keys(&json),
        vec![
            "hotspots",
            "memory_leaks",
            "optimization_suggestions",
            "performance_score"
        ]
    );
    assert_eq!(json["hotspots"][0]["type"], "nested_loop");
    assert_eq!(json["hotspots"][0]["severity"], "high");
}

#[test]
fn integrity_json_fields() {
    let json = serde_json::to_value(check_integrity(&fixture("insecure.py"))).unwrap();
    assert_eq!(
        keys(&json),
        vec!["best_practice_violations", "integrity_issues", "security_issues"]
    );
    let failed = serde_json::to_value(check_integrity(&fixture("broken.py"))).unwrap();
    assert!(failed["error"].is_string());
}

#[test]
fn scaffold_json_fields() {
    let source = fixture("inventory.py");
    let analysis = analyze(&source).unwrap();
    let json = serde_json::to_value(build_scaffold(&source, &analysis, 5)).unwrap();
    assert_eq!(keys(&json), vec!["coverage_estimate", "test_code", "test_count"]);
}

#[test]
fn execution_result_optional_fields_are_omitted() {
    let json = serde_json::to_value(ExecutionResult::failed("boom")).unwrap();
    assert_eq!(
        keys(&json),
        vec![
            "error",
            "execution_time",
            "memory_usage",
            "output",
            "output_truncated",
            "success",
            "timed_out"
        ]
    );
    assert_eq!(json["error"], "boom");
}

#[test]
fn test_outcome_round_trips() {
    let outcome = TestOutcome::failed("Test_2", "Test failed - check implementation");
    let json = serde_json::to_string(&outcome).unwrap();
    let back: TestOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome);
}

#[test]
fn evaluation_report_round_trips() {
    let source = fixture("inventory.py");
    let report = EvaluationReport {
        source_hash: "abc".to_string(),
        analysis: Some(AnalysisOutcome::from(analyze(&source))),
        integrity: check_integrity(&source),
        profile: Some(profile(&source)),
        scaffold: None,
        execution: ExecutionResult::failed("not run"),
    };
    let json = serde_json::to_string(&report).unwrap();
    let back: EvaluationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert!(!json.contains("\"scaffold\""));
}
