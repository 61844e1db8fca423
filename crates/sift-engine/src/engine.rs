use std::path::Path;

use sift_analyze::types::{Analysis, IntegrityReport, PerformanceProfile, TestScaffold};
use sift_core::config::SiftConfig;
use sift_core::hash::source_fingerprint;
use sift_core::types::{DifficultyTier, SyntaxError};
use sift_exec::{ExecutionResult, Executor, TestOutcome};

use crate::types::{AnalysisOutcome, EvaluationReport, EvaluationRequest};

/// Language tags accepted by [`Engine::evaluate`]; an empty tag counts as
/// Python.
const PYTHON_TAGS: &[&str] = &["", "python", "python3", "py"];

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unsupported language `{0}`: only Python sources can be evaluated")]
    UnsupportedLanguage(String),
}

/// Entry point for the orchestration layer. Holds configuration only, so it
/// is cheap to clone and safe to share between concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: SiftConfig,
    executor: Executor,
}

impl Engine {
    pub fn new(config: SiftConfig) -> Self {
        let executor = Executor::new(config.executor.clone());
        Self { config, executor }
    }

    /// Engine configured from `sift.json` in `dir`, or defaults.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(SiftConfig::load(dir))
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    pub fn analyze(&self, source: &str) -> Result<Analysis, SyntaxError> {
        sift_analyze::analyze_with(source, &self.config.analysis)
    }

    pub fn check_integrity(&self, source: &str) -> IntegrityReport {
        sift_analyze::check_integrity(source)
    }

    pub fn profile(&self, source: &str) -> PerformanceProfile {
        sift_analyze::profile(source)
    }

    pub fn generate_tests(
        &self,
        source: &str,
        analysis: &Analysis,
        tier: DifficultyTier,
    ) -> TestScaffold {
        sift_analyze::build_scaffold(source, analysis, tier.test_budget())
    }

    /// Execute with `timeout_secs`, or the configured default.
    pub async fn execute(&self, source: &str, timeout_secs: Option<u64>) -> ExecutionResult {
        let timeout = timeout_secs.unwrap_or(self.config.executor.timeout_seconds);
        self.executor.execute(source, timeout).await
    }

    pub async fn run_generated_tests(&self, combined_source: &str) -> Vec<TestOutcome> {
        self.executor.run_generated_tests(combined_source).await
    }

    /// Run every requested component for one submission.
    ///
    /// Only an unsupported language tag is an error. Syntax errors and
    /// failed runs are reported inside the returned report, and one
    /// component failing never suppresses the others.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationReport, EngineError> {
        let language = request.language.trim().to_ascii_lowercase();
        if !PYTHON_TAGS.contains(&language.as_str()) {
            return Err(EngineError::UnsupportedLanguage(request.language.clone()));
        }
        let source = request.source.as_str();
        let source_hash = source_fingerprint("python", source);
        tracing::info!(%source_hash, bytes = source.len(), "evaluating submission");

        let analysis = (request.analyze || request.generate_tests)
            .then(|| AnalysisOutcome::from(self.analyze(source)));
        let (integrity, profile) = rayon::join(
            || self.check_integrity(source),
            || request.profile.then(|| self.profile(source)),
        );

        let scaffold = match analysis.as_ref().and_then(AnalysisOutcome::as_analysis) {
            Some(a) if request.generate_tests => {
                let tier = request.tier(self.config.scaffold.default_difficulty);
                Some(self.generate_tests(source, a, tier))
            }
            _ => None,
        };

        let mut execution = self.execute(source, request.timeout_seconds).await;
        if let Some(scaffold) = &scaffold {
            execution.test_results = Some(self.run_generated_tests(&scaffold.test_code).await);
        }

        Ok(EvaluationReport {
            source_hash,
            analysis,
            integrity,
            profile,
            scaffold,
            execution,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
