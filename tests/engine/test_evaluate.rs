/// Full evaluations through the engine facade.
use sift_analyze::types::HotspotKind;
use sift_core::config::{SiftConfig, CONFIG_FILE};
use sift_core::types::FindingCategory;
use sift_engine::{AnalysisOutcome, Engine, EngineError, EvaluationRequest};

use crate::common::fixture;
use crate::common::generators::generate_deep_nesting;

#[tokio::test]
async fn test_full_evaluation_of_inventory() {
    require_python!();
    let engine = Engine::default();
    let request = EvaluationRequest::new(fixture("inventory.py")).with_tests("mid");
    let report = engine.evaluate(&request).await.unwrap();

    let analysis = report
        .analysis
        .as_ref()
        .and_then(AnalysisOutcome::as_analysis)
        .unwrap();
    assert_eq!(analysis.complexity, 9);
    assert!(report.integrity.is_clean());
    assert_eq!(report.profile.as_ref().unwrap().performance_score, 100);

    let scaffold = report.scaffold.as_ref().unwrap();
    assert_eq!(scaffold.test_count, 4);
    assert!(report.execution.success);
    assert_eq!(report.execution.output, "3\n");
    let outcomes = report.execution.test_results.as_ref().unwrap();
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.passed));
}

#[tokio::test]
async fn test_components_fail_independently() {
    let engine = Engine::default();
    let request = EvaluationRequest::new(fixture("broken.py")).with_tests("high");
    let report = engine.evaluate(&request).await.unwrap();

    assert!(matches!(report.analysis, Some(AnalysisOutcome::Error(_))));
    assert!(report.integrity.error.is_some());
    assert!(report.profile.as_ref().unwrap().error.is_some());
    assert!(report.scaffold.is_none());
    assert!(!report.execution.success);
    assert!(report.execution.error.is_some());
}

#[tokio::test]
async fn test_findings_and_hotspots_in_one_report() {
    let engine = Engine::default();
    let mut source = fixture("insecure.py");
    source.push_str(&fixture("loops.py"));
    let mut request = EvaluationRequest::new(source);
    request.timeout_seconds = Some(1);
    let report = engine.evaluate(&request).await.unwrap();

    assert!(report
        .integrity
        .security_issues
        .iter()
        .any(|f| f.category == FindingCategory::DangerousFunction));
    let profile = report.profile.as_ref().unwrap();
    assert!(profile
        .hotspots
        .iter()
        .all(|h| h.kind == HotspotKind::NestedLoop));
    assert_eq!(profile.hotspots.len(), 4);
}

#[tokio::test]
async fn test_config_timeout_applies() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{ "executor": { "timeout_seconds": 1 } }"#,
    )
    .unwrap();
    let engine = Engine::from_dir(dir.path());
    let report = engine
        .evaluate(&EvaluationRequest::new("while True:\n    pass\n"))
        .await
        .unwrap();
    assert!(report.execution.timed_out);
    assert_eq!(
        report.execution.error.as_deref(),
        Some("Execution timeout (1 seconds)")
    );
}

#[tokio::test]
async fn test_missing_interpreter_is_reported_not_raised() {
    let mut config = SiftConfig::default();
    config.executor.interpreter = "sift-no-such-python".to_string();
    let engine = Engine::new(config);
    let report = engine
        .evaluate(&EvaluationRequest::new("print(1)\n").with_tests("low"))
        .await
        .unwrap();
    assert!(!report.execution.success);
    assert!(report
        .execution
        .error
        .as_deref()
        .unwrap()
        .contains("sift-no-such-python"));
    let outcomes = report.execution.test_results.unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].passed);
}

#[tokio::test]
async fn test_other_languages_are_rejected() {
    let err = Engine::default()
        .evaluate(&EvaluationRequest::new("fn main() {}").with_language("rust"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedLanguage(_)));
}

#[tokio::test]
async fn test_pathological_nesting_reports_instead_of_crashing() {
    let engine = Engine::default();
    let request =
        EvaluationRequest::new(generate_deep_nesting(10_000)).with_tests("high");
    let report = engine.evaluate(&request).await.unwrap();

    assert!(matches!(report.analysis, Some(AnalysisOutcome::Error(_))));
    assert!(report.integrity.error.is_some());
    assert!(report.profile.as_ref().unwrap().error.is_some());
    assert!(report.scaffold.is_none());
    assert!(!report.execution.success);
}
