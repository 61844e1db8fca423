use serde::{Deserialize, Serialize};
use sift_analyze::types::{Analysis, IntegrityReport, PerformanceProfile, TestScaffold};
use sift_core::types::{DifficultyTier, SyntaxError};
use sift_exec::ExecutionResult;

/// One submission from the orchestration layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub source: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Tier name (`low`, `mid`, `high`); unknown names mean `mid`.
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Overrides the configured execution timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub generate_tests: bool,
    #[serde(default = "default_true")]
    pub analyze: bool,
    #[serde(default = "default_true")]
    pub profile: bool,
}

fn default_language() -> String {
    "python".to_string()
}

fn default_true() -> bool {
    true
}

impl EvaluationRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            language: default_language(),
            difficulty: None,
            timeout_seconds: None,
            generate_tests: false,
            analyze: true,
            profile: true,
        }
    }

    pub fn with_tests(mut self, difficulty: impl Into<String>) -> Self {
        self.generate_tests = true;
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Requested tier, or `default` when none was given.
    pub fn tier(&self, default: DifficultyTier) -> DifficultyTier {
        self.difficulty
            .as_deref()
            .map(DifficultyTier::from_name)
            .unwrap_or(default)
    }
}

/// Structural analysis, or the syntax error that prevented it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Analysis(Analysis),
    Error(SyntaxError),
}

impl AnalysisOutcome {
    pub fn as_analysis(&self) -> Option<&Analysis> {
        match self {
            AnalysisOutcome::Analysis(a) => Some(a),
            AnalysisOutcome::Error(_) => None,
        }
    }
}

impl From<Result<Analysis, SyntaxError>> for AnalysisOutcome {
    fn from(result: Result<Analysis, SyntaxError>) -> Self {
        match result {
            Ok(a) => AnalysisOutcome::Analysis(a),
            Err(e) => AnalysisOutcome::Error(e),
        }
    }
}

/// Everything produced for one [`EvaluationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Fingerprint of the submitted source, usable as a storage key.
    pub source_hash: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analysis: Option<AnalysisOutcome>,
    pub integrity: IntegrityReport,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile: Option<PerformanceProfile>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scaffold: Option<TestScaffold>,
    pub execution: ExecutionResult,
}
