use serde::{Deserialize, Serialize};

/// Severity attached to integrity findings and profiler hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule family a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    DangerousFunction,
    HardcodedCredential,
    InjectionRisk,
    DuplicateDefinition,
    BareExcept,
    WildcardImport,
    MutableDefault,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::DangerousFunction => "dangerous-function",
            FindingCategory::HardcodedCredential => "hardcoded-credential",
            FindingCategory::InjectionRisk => "injection-risk",
            FindingCategory::DuplicateDefinition => "duplicate-definition",
            FindingCategory::BareExcept => "bare-except",
            FindingCategory::WildcardImport => "wildcard-import",
            FindingCategory::MutableDefault => "mutable-default",
        }
    }
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule hit produced by the integrity checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    /// Function or variable the finding is about, when there is one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
    /// 1-based source line.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<u32>,
    pub severity: Severity,
    pub message: String,
}

/// Source text that does not parse.
///
/// `line` and `column` are 1-based and present whenever the parser could
/// point at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

/// Requested thoroughness of generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Low,
    #[default]
    Mid,
    High,
}

impl DifficultyTier {
    /// Maximum number of test functions generated for this tier.
    pub fn test_budget(&self) -> usize {
        match self {
            DifficultyTier::Low => 5,
            DifficultyTier::Mid => 15,
            DifficultyTier::High => 25,
        }
    }

    /// Lenient parse: anything unrecognised maps to [`DifficultyTier::Mid`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" | "easy" => DifficultyTier::Low,
            "high" | "hard" => DifficultyTier::High,
            _ => DifficultyTier::Mid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Low => "low",
            DifficultyTier::Mid => "mid",
            DifficultyTier::High => "high",
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
